//! C7: Feedback Synthesizer — pure derivation of narrative feedback from a
//! `FinalScore` and `SemanticMatchResult`: strengths, gaps, recommendations,
//! and career/interview tips (§4.7). Template-based; an optional `LlmBackend`
//! may enrich `overall_assessment` only.

use crate::backends::LlmBackend;
use crate::models::{
    ConfidenceLevel, FeedbackBundle, FinalScore, ParsedJobDescription, ParsedResume,
    SemanticMatchResult, SkillGapAnalysis, Suitability,
};

const CLOUD_FAMILY: [&str; 4] = ["aws", "azure", "gcp", "google cloud"];
const CRITICAL_KEYWORDS: [&str; 4] = ["required", "must", "essential", "mandatory"];

fn overall_assessment(score: &FinalScore) -> String {
    match score.suitability {
        Suitability::High => format!(
            "This candidate is a strong fit for the role, scoring {:.1}/100 overall. Their skills and experience closely align with the job's requirements.",
            score.overall_score
        ),
        Suitability::Medium if score.overall_score >= 60.0 => format!(
            "This candidate is a reasonable fit for the role, scoring {:.1}/100 overall. Some gaps exist but the core qualifications are present.",
            score.overall_score
        ),
        Suitability::Medium => format!(
            "This candidate is a moderate fit for the role, scoring {:.1}/100 overall. Several qualifications are only partially met.",
            score.overall_score
        ),
        Suitability::Low if score.overall_score >= 40.0 => format!(
            "This candidate is a weak fit for the role, scoring {:.1}/100 overall. Significant gaps remain against the job's requirements.",
            score.overall_score
        ),
        Suitability::Low => format!(
            "This candidate does not appear to be a fit for the role, scoring {:.1}/100 overall.",
            score.overall_score
        ),
    }
}

fn identify_strengths(score: &FinalScore, resume: &ParsedResume) -> Vec<String> {
    let ds = &score.detailed_scores;
    let mut strengths = Vec::new();

    if ds.hard_skills_score >= 80.0 {
        strengths.push("Strong technical skill match with the job requirements.".to_string());
    }
    if ds.experience_score >= 80.0 {
        strengths.push("Relevant and substantial professional experience.".to_string());
    }
    if ds.education_score >= 80.0 {
        strengths.push("Educational background aligns well with the role.".to_string());
    }
    if ds.semantic_score >= 80.0 {
        strengths.push("Overall resume content closely matches the job description.".to_string());
    }
    if resume.skills.skill_diversity_score >= 0.75 {
        strengths.push("Diverse skill set spanning multiple technical domains.".to_string());
    }
    if !resume.certifications.is_empty() {
        strengths.push("Holds relevant professional certifications.".to_string());
    }
    if !resume.projects.is_empty() {
        strengths.push("Demonstrates hands-on project experience.".to_string());
    }
    if resume.total_experience_years.unwrap_or(0.0) >= 5.0 {
        strengths.push("Extensive track record of professional experience.".to_string());
    }

    strengths.truncate(6);
    strengths
}

fn identify_areas_for_improvement(score: &FinalScore, match_result: &SemanticMatchResult, resume: &ParsedResume) -> Vec<String> {
    let ds = &score.detailed_scores;
    let mut areas = Vec::new();

    if ds.hard_skills_score < 60.0 {
        areas.push("Technical skills do not strongly align with the job requirements.".to_string());
    }
    if ds.experience_score < 60.0 {
        areas.push("Professional experience is limited relative to the role's expectations.".to_string());
    }
    if ds.education_score < 60.0 {
        areas.push("Educational background is below the role's stated requirements.".to_string());
    }
    if ds.semantic_score < 60.0 {
        areas.push("Overall resume content shows limited overlap with the job description.".to_string());
    }
    if !match_result.missing_skills.is_empty() {
        areas.push(format!(
            "Missing {} required skill(s) from the job posting.",
            match_result.missing_skills.len()
        ));
    }
    if resume.certifications.is_empty() {
        areas.push("No professional certifications listed.".to_string());
    }

    areas.truncate(5);
    areas
}

fn specific_recommendations(match_result: &SemanticMatchResult, jd: &ParsedJobDescription, score: &FinalScore) -> Vec<String> {
    let mut recommendations = Vec::new();

    for skill in match_result.missing_skills.iter().take(3) {
        recommendations.push(format!("Consider developing skills in {}.", skill));
    }

    if score.detailed_scores.relevance_sub_score < 70.0 {
        recommendations.push("Tailor work experience descriptions to better reflect this role's responsibilities.".to_string());
    }

    recommendations.push("Build a portfolio showcasing relevant project work.".to_string());

    let wants_cloud_cert = jd
        .required_skills
        .iter()
        .any(|s| CLOUD_FAMILY.iter().any(|c| s.to_lowercase().contains(c)));
    if wants_cloud_cert {
        recommendations.push("Pursue a cloud platform certification relevant to the listed requirements.".to_string());
    }

    recommendations.push("Expand professional network within the target industry.".to_string());

    if score.detailed_scores.hard_skills_score < 70.0 {
        recommendations.push("Revise the resume to more explicitly surface relevant technical skills.".to_string());
    }

    recommendations.truncate(6);
    recommendations
}

fn is_critical(skill: &str) -> bool {
    let lower = skill.to_lowercase();
    CRITICAL_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

fn learning_resource_for(skill: &str) -> String {
    let lower = skill.to_lowercase();
    let mapping: [(&str, &str); 8] = [
        ("python", "Python fundamentals course (e.g. Real Python, Coursera)"),
        ("javascript", "Modern JavaScript course (e.g. freeCodeCamp)"),
        ("react", "React official documentation and tutorial"),
        ("aws", "AWS Cloud Practitioner certification path"),
        ("docker", "Docker Mastery course"),
        ("kubernetes", "Kubernetes fundamentals (CKA prep)"),
        ("sql", "SQL for Data Analysis course"),
        ("machine learning", "Machine learning specialization (e.g. Coursera, fast.ai)"),
    ];
    for (key, resource) in mapping {
        if lower.contains(key) {
            return resource.to_string();
        }
    }
    format!("Online course covering {}", skill)
}

fn skill_gap_analysis(match_result: &SemanticMatchResult, profile_skills_by_category: &[(String, String)]) -> SkillGapAnalysis {
    let critical_missing: Vec<String> = match_result
        .missing_skills
        .iter()
        .filter(|s| is_critical(s))
        .cloned()
        .collect();

    let nice_to_have: Vec<String> = match_result
        .missing_skills
        .iter()
        .filter(|s| !is_critical(s))
        .cloned()
        .collect();

    let learning_resources: Vec<String> = match_result
        .missing_skills
        .iter()
        .take(3)
        .map(|s| learning_resource_for(s))
        .collect();

    let missing_categories: std::collections::HashSet<&str> = profile_skills_by_category
        .iter()
        .filter(|(name, _)| match_result.missing_skills.iter().any(|m| m.eq_ignore_ascii_case(name)))
        .map(|(_, category)| category.as_str())
        .collect();

    let alternative_skills: Vec<String> = match_result
        .additional_skills
        .iter()
        .filter(|extra| {
            profile_skills_by_category
                .iter()
                .any(|(name, category)| name == *extra && missing_categories.contains(category.as_str()))
        })
        .take(2)
        .cloned()
        .collect();

    SkillGapAnalysis {
        critical_missing,
        nice_to_have,
        learning_resources,
        alternative_skills,
    }
}

fn career_advancement_tips(resume: &ParsedResume) -> Vec<String> {
    let mut tips = Vec::new();
    let years = resume.total_experience_years.unwrap_or(0.0);

    if years < 2.0 {
        tips.push("Focus on building foundational skills and seeking mentorship opportunities.".to_string());
    } else if years < 5.0 {
        tips.push("Consider taking on stretch projects to build toward a senior role.".to_string());
    } else {
        tips.push("Highlight leadership and mentorship experience when pursuing senior or staff roles.".to_string());
    }

    tips.push("Keep a running log of quantifiable achievements for future resume updates.".to_string());
    tips.push("Seek feedback from peers and managers on areas for growth.".to_string());
    tips.push("Stay current with industry trends through conferences or online communities.".to_string());
    tips.push("Consider obtaining a certification aligned with your target role.".to_string());

    tips.truncate(6);
    tips
}

fn interview_preparation_tips(score: &FinalScore, match_result: &SemanticMatchResult, jd: &ParsedJobDescription) -> Vec<String> {
    let mut tips = Vec::new();

    if !match_result.missing_skills.is_empty() {
        tips.push("Prepare to discuss how you would close the identified skill gaps.".to_string());
    }
    if score.overall_score >= 80.0 {
        tips.push("Lead with your strongest, most relevant accomplishments early in the conversation.".to_string());
    }

    tips.push("Research the company's recent projects and challenges.".to_string());
    tips.push("Prepare specific, quantified examples using the STAR method.".to_string());
    tips.push("Practice explaining technical decisions in plain language.".to_string());
    tips.push("Prepare thoughtful questions about team structure and expectations.".to_string());
    tips.push("Review the job posting line by line before the interview.".to_string());

    if let Some(title) = &jd.title {
        let lower = title.to_lowercase();
        if lower.contains("engineer") {
            tips.push("Be ready for a hands-on technical or system-design assessment.".to_string());
        }
        if lower.contains("manager") {
            tips.push("Prepare examples of cross-functional leadership and conflict resolution.".to_string());
        }
    }

    tips.truncate(8);
    tips
}

/// `BuildFeedback(parsed_resume, score, match, parsed_jd) → FeedbackBundle`
/// from the core API. Takes no LLM backend.
pub fn build_feedback(
    resume: &ParsedResume,
    score: &FinalScore,
    match_result: &SemanticMatchResult,
    jd: &ParsedJobDescription,
) -> FeedbackBundle {
    build_feedback_with_llm(resume, score, match_result, jd, None)
}

/// Same as `build_feedback`, but allows an optional `LlmBackend` to enrich
/// `overall_assessment`. The LLM call never affects any other field and a
/// failed/absent call simply keeps the templated assessment.
pub fn build_feedback_with_llm(
    resume: &ParsedResume,
    score: &FinalScore,
    match_result: &SemanticMatchResult,
    jd: &ParsedJobDescription,
    llm: Option<&dyn LlmBackend>,
) -> FeedbackBundle {
    let profile_skills_by_category: Vec<(String, String)> = resume
        .skills
        .all_skills()
        .map(|s| (s.name.clone(), s.category.as_str().to_string()))
        .collect();

    let mut assessment = overall_assessment(score);
    if let Some(backend) = llm {
        let prompt = format!(
            "Write a one-paragraph hiring assessment for a candidate scoring {:.1}/100 ({:?} suitability).",
            score.overall_score, score.suitability
        );
        if let Some(generated) = backend.generate(&prompt, 200, 0.7) {
            assessment = generated;
        }
    }

    FeedbackBundle {
        overall_assessment: assessment,
        strengths: identify_strengths(score, resume),
        areas_for_improvement: identify_areas_for_improvement(score, match_result, resume),
        specific_recommendations: specific_recommendations(match_result, jd, score),
        skill_gap_analysis: skill_gap_analysis(match_result, &profile_skills_by_category),
        career_advancement_tips: career_advancement_tips(resume),
        interview_preparation_tips: interview_preparation_tips(score, match_result, jd),
        confidence_level: score.confidence_level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContactInfo, DetailedScores, SkillProfile};

    fn sample_score(suitability: Suitability) -> FinalScore {
        FinalScore {
            overall_score: 85.0,
            detailed_scores: DetailedScores {
                hard_skills_score: 90.0,
                soft_skills_score: 70.0,
                experience_score: 85.0,
                education_score: 80.0,
                semantic_score: 75.0,
                technical_sub_score: 90.0,
                domain_sub_score: 0.0,
                tools_sub_score: 0.0,
                years_sub_score: 100.0,
                relevance_sub_score: 70.0,
                education_level_sub_score: 100.0,
                education_relevance_sub_score: 70.0,
                skills_matched_count: 5,
                skills_missing_count: 0,
                parsing_confidence: 90.0,
                matching_confidence: 95.0,
                overall_confidence: 90.0,
            },
            suitability,
            percentile_rank: None,
            confidence_level: ConfidenceLevel::High,
        }
    }

    fn empty_resume() -> ParsedResume {
        ParsedResume {
            contact: ContactInfo::default(),
            summary: None,
            skills: SkillProfile::default(),
            education: Vec::new(),
            work_experience: Vec::new(),
            projects: Vec::new(),
            certifications: Vec::new(),
            languages: Vec::new(),
            awards: Vec::new(),
            total_experience_years: None,
            raw_text: String::new(),
            parsing_confidence: 1.0,
        }
    }

    fn empty_jd() -> ParsedJobDescription {
        ParsedJobDescription {
            title: None,
            company: None,
            location: None,
            department: None,
            job_type: None,
            salary_range: None,
            experience_required_text: None,
            summary: None,
            responsibilities: Vec::new(),
            requirements: Vec::new(),
            preferred_qualifications: Vec::new(),
            benefits: Vec::new(),
            required_skills: Vec::new(),
            preferred_skills: Vec::new(),
            required_experience_years: None,
            education_requirements: Vec::new(),
            remote_allowed: false,
            urgency_level: crate::models::UrgencyLevel::Low,
            raw_content: String::new(),
        }
    }

    fn empty_match() -> SemanticMatchResult {
        SemanticMatchResult {
            overall_similarity: 0.0,
            skill_matches: Vec::new(),
            missing_skills: vec!["kubernetes (required)".to_string()],
            additional_skills: Vec::new(),
            category_similarities: Default::default(),
            embedding_similarity: 0.0,
            text_similarity: 0.0,
        }
    }

    #[test]
    fn high_suitability_produces_positive_assessment() {
        let score = sample_score(Suitability::High);
        let feedback = build_feedback(&empty_resume(), &score, &empty_match(), &empty_jd());
        assert!(feedback.overall_assessment.to_lowercase().contains("strong fit"));
    }

    #[test]
    fn missing_critical_skill_lands_in_critical_bucket() {
        let score = sample_score(Suitability::Medium);
        let match_result = empty_match();
        let feedback = build_feedback(&empty_resume(), &score, &match_result, &empty_jd());
        assert_eq!(feedback.skill_gap_analysis.critical_missing.len(), 1);
        assert!(feedback.skill_gap_analysis.nice_to_have.is_empty());
    }

    #[test]
    fn recommendations_capped_at_six() {
        let score = sample_score(Suitability::Medium);
        let match_result = SemanticMatchResult {
            missing_skills: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            ..empty_match()
        };
        let jd = ParsedJobDescription {
            required_skills: vec!["aws certified".into()],
            ..empty_jd()
        };
        let feedback = build_feedback(&empty_resume(), &score, &match_result, &jd);
        assert!(feedback.specific_recommendations.len() <= 6);
    }

    #[test]
    fn confidence_level_echoes_final_score() {
        let score = sample_score(Suitability::High);
        let feedback = build_feedback(&empty_resume(), &score, &empty_match(), &empty_jd());
        assert_eq!(feedback.confidence_level, ConfidenceLevel::High);
    }
}
