//! C6: Scoring Engine — combines structured resume/job data and match
//! results into a weighted `FinalScore` with explanatory sub-scores (§4.6).

use crate::config::Weights;
use crate::error::PipelineResult;
use crate::models::{
    ConfidenceLevel, DetailedScores, FinalScore, ParsedJobDescription, ParsedResume,
    SemanticMatchResult, Suitability,
};
use crate::textsim;
use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

const DEFAULT_REQUIRED_YEARS: f64 = 2.0;
const CRITICAL_KEYWORDS: [&str; 4] = ["required", "must", "essential", "mandatory"];
const SOFT_SKILL_KEYWORDS: [&str; 10] = [
    "communication",
    "leadership",
    "teamwork",
    "problem solving",
    "adaptability",
    "creativity",
    "time management",
    "collaboration",
    "critical thinking",
    "empathy",
];

fn education_level(text: &str) -> u8 {
    let lower = text.to_lowercase();
    if lower.contains("phd") || lower.contains("doctorate") {
        5
    } else if lower.contains("master") || lower.contains("mba") || lower.contains(" ms ") || lower.contains(" ma ") {
        4
    } else if lower.contains("bachelor") || lower.contains(" bs ") || lower.contains(" ba ") {
        3
    } else if lower.contains("associate") {
        2
    } else if lower.contains("diploma") || lower.contains("certificate") {
        1
    } else {
        0
    }
}

fn required_education_level(jd_text: &str) -> u8 {
    let level = education_level(jd_text);
    if level == 0 {
        2
    } else {
        level
    }
}

fn hard_skills_score(resume: &ParsedResume, jd: &ParsedJobDescription, result: &SemanticMatchResult) -> f64 {
    let required_count = jd.required_skills.len();
    if required_count == 0 {
        return 0.5;
    }

    let matched_with_conf = result.skill_matches.iter().filter(|m| m.confidence >= 0.70).count();
    let base = matched_with_conf as f64 / required_count as f64;

    let diversity = resume_diversity(resume);
    let high_conf = result.skill_matches.iter().filter(|m| m.confidence >= 0.90).count();

    let critical_skills: Vec<&String> = jd
        .required_skills
        .iter()
        .filter(|s| {
            let lower = s.to_lowercase();
            CRITICAL_KEYWORDS.iter().any(|kw| lower.contains(kw))
        })
        .collect();

    let missing_critical = critical_skills
        .iter()
        .filter(|s| result.missing_skills.iter().any(|m| m.to_lowercase() == s.to_lowercase()))
        .count();

    let critical_penalty = if critical_skills.is_empty() {
        0.0
    } else {
        0.3 * missing_critical as f64 / critical_skills.len() as f64
    };

    let score = base + 0.2 * diversity + 0.1 * (high_conf as f64 / required_count as f64) - critical_penalty;
    score.clamp(0.0, 1.0)
}

fn resume_diversity(resume: &ParsedResume) -> f64 {
    resume.skills.skill_diversity_score
}

fn soft_skills_score(resume: &ParsedResume, jd: &ParsedJobDescription) -> f64 {
    let jd_lower = jd.raw_content.to_lowercase();
    let jd_soft: Vec<&str> = SOFT_SKILL_KEYWORDS
        .iter()
        .copied()
        .filter(|kw| jd_lower.contains(kw))
        .collect();

    let resume_soft_names: HashSet<String> = resume
        .skills
        .soft_skills
        .iter()
        .map(|s| s.name.to_lowercase())
        .collect();

    let base = if !jd_soft.is_empty() {
        let matched = jd_soft.iter().filter(|kw| resume_soft_names.contains(**kw)).count();
        matched as f64 / jd_soft.len() as f64
    } else if !resume.skills.soft_skills.is_empty() {
        0.8
    } else {
        0.3
    };

    let variety_bonus = (resume.skills.soft_skills.len() as f64 / 10.0).min(0.2);
    (base + variety_bonus).min(1.0)
}

/// r < 1.0 branches scale down linearly/steppedly; r ≥ 1.0 always caps at
/// 1.0 even with the "+0.1 if r≥1.5" bonus the spec calls out.
fn years_score(candidate_years: f64, required_years: f64) -> f64 {
    let required = if required_years <= 0.0 {
        DEFAULT_REQUIRED_YEARS
    } else {
        required_years
    };
    let r = candidate_years / required;
    if r >= 1.0 {
        1.0
    } else if r >= 0.75 {
        0.8
    } else if r >= 0.5 {
        0.6
    } else {
        0.5 * r
    }
}

fn tokenize_lower(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_string())
        .collect()
}

fn relevance_score(resume: &ParsedResume, jd: &ParsedJobDescription, current_year: i32) -> f64 {
    if resume.work_experience.is_empty() {
        return 0.2;
    }

    let jd_keywords: HashSet<String> = jd
        .required_skills
        .iter()
        .map(|s| s.to_lowercase())
        .chain(jd.responsibilities.iter().flat_map(|r| tokenize_lower(r)))
        .collect();

    let mut entry_scores: Vec<f64> = resume
        .work_experience
        .iter()
        .map(|entry| {
            let title_tokens = tokenize_lower(&entry.title);
            let jd_title_tokens: HashSet<String> = jd.title.as_deref().map(tokenize_lower).unwrap_or_default();
            let title_relevance = textsim::jaccard_similarity(&title_tokens, &jd_title_tokens);

            let company_tokens = tokenize_lower(&entry.company);
            let jd_company_tokens: HashSet<String> =
                jd.company.as_deref().map(tokenize_lower).unwrap_or_default();
            let industry_relevance = if company_tokens.intersection(&jd_company_tokens).count() > 0 {
                0.9
            } else {
                0.4
            };

            let description_relevance = if entry.description.is_empty() {
                0.3
            } else {
                let description_tokens: HashSet<String> =
                    entry.description.iter().flat_map(|d| tokenize_lower(d)).collect();
                let hits = description_tokens.intersection(&jd_keywords).count();
                if jd_keywords.is_empty() {
                    0.0
                } else {
                    hits as f64 / jd_keywords.len() as f64
                }
            };

            let recency_weight = match entry.end_date.as_deref() {
                Some("Present") | None => 1.0,
                Some(other) => {
                    let end_year = extract_year(other).unwrap_or(current_year);
                    (1.0 - 0.1 * (current_year - end_year) as f64).max(0.5)
                }
            };

            (0.4 * title_relevance + 0.2 * industry_relevance + 0.4 * description_relevance) * recency_weight
        })
        .collect();

    entry_scores.sort_by(|a, b| b.partial_cmp(a).unwrap());

    match entry_scores.len() {
        0 => 0.0,
        1 => entry_scores[0],
        2 => 0.7 * entry_scores[0] + 0.3 * entry_scores[1],
        _ => 0.5 * entry_scores[0] + 0.3 * entry_scores[1] + 0.2 * entry_scores[2],
    }
}

fn extract_year(token: &str) -> Option<i32> {
    static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());
    YEAR_RE.find(token).and_then(|m| m.as_str().parse().ok())
}

fn experience_score(resume: &ParsedResume, jd: &ParsedJobDescription, current_year: i32) -> (f64, f64, f64) {
    let candidate_years = resume.total_experience_years.unwrap_or(0.0);
    let required = jd.required_experience_years.map(|y| y as f64).unwrap_or(0.0);
    let years = years_score(candidate_years, required);
    let relevance = relevance_score(resume, jd, current_year);
    (0.6 * years + 0.4 * relevance, years, relevance)
}

fn domain_keywords_for(title_and_content: &str) -> &'static [&'static str] {
    let lower = title_and_content.to_lowercase();
    const FAMILIES: [(&str, &[&str]); 5] = [
        ("software", &["software", "engineering", "development", "code", "programming"]),
        ("data", &["data", "analytics", "statistics", "machine learning"]),
        ("marketing", &["marketing", "brand", "campaign", "seo"]),
        ("finance", &["finance", "accounting", "investment", "budget"]),
        ("sales", &["sales", "account", "quota", "revenue"]),
    ];
    for (family, keywords) in FAMILIES.iter() {
        if lower.contains(family) {
            return keywords;
        }
    }
    FAMILIES[0].1
}

fn education_relevance(resume: &ParsedResume, jd: &ParsedJobDescription) -> f64 {
    let title_and_content = format!("{} {}", jd.title.clone().unwrap_or_default(), jd.raw_content);
    let keywords = domain_keywords_for(&title_and_content);

    let degree_text: String = resume
        .education
        .iter()
        .filter_map(|e| e.degree.as_deref())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    if degree_text.is_empty() {
        return 0.7;
    }

    let hits = keywords.iter().filter(|kw| degree_text.contains(**kw)).count();
    if hits == 0 {
        0.7
    } else {
        hits as f64 / keywords.len() as f64
    }
}

fn education_score(resume: &ParsedResume, jd: &ParsedJobDescription) -> (f64, f64, f64) {
    let required_level = required_education_level(&jd.raw_content);
    let candidate_max = resume
        .education
        .iter()
        .filter_map(|e| e.degree.as_deref())
        .map(education_level)
        .max()
        .unwrap_or(0);

    let level_score = if candidate_max as i32 >= required_level as i32 {
        1.0
    } else if candidate_max as i32 == required_level as i32 - 1 {
        0.8
    } else {
        0.5
    };

    let relevance = education_relevance(resume, jd);
    (0.6 * level_score + 0.4 * relevance, level_score, relevance)
}

fn confidence_level_of(
    parsing_confidence: f64,
    resume: &ParsedResume,
    jd: &ParsedJobDescription,
    result: &SemanticMatchResult,
) -> (f64, ConfidenceLevel) {
    let matching_confidence = if result.skill_matches.is_empty() {
        0.5
    } else {
        result.skill_matches.iter().map(|m| m.confidence).sum::<f64>() / result.skill_matches.len() as f64
    };

    let required_count = jd.required_skills.len();
    let coverage_factor = if required_count == 0 {
        1.0
    } else {
        (result.skill_matches.len() as f64 / required_count as f64).min(1.0)
    };

    let email_factor = if resume.contact.email.is_some() { 1.0 } else { 0.5 };
    let experience_factor = if !resume.work_experience.is_empty() { 1.0 } else { 0.3 };

    let overall_confidence =
        (parsing_confidence + matching_confidence + coverage_factor + email_factor + experience_factor) / 5.0;

    let level = if overall_confidence >= 0.8 {
        ConfidenceLevel::High
    } else if overall_confidence >= 0.6 {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    };

    (overall_confidence, level)
}

fn suitability_from_overall(overall: f64, thresholds: &crate::config::Thresholds) -> Suitability {
    if overall >= thresholds.high {
        Suitability::High
    } else if overall >= thresholds.medium {
        Suitability::Medium
    } else {
        Suitability::Low
    }
}

fn downgrade(suitability: Suitability) -> Suitability {
    match suitability {
        Suitability::High => Suitability::Medium,
        Suitability::Medium => Suitability::Low,
        Suitability::Low => Suitability::Low,
    }
}

/// `Score(parsed_resume, profile, match, parsed_jd, weights?) → FinalScore |
/// InvalidWeights` from the core API.
pub fn score(
    resume: &ParsedResume,
    jd: &ParsedJobDescription,
    result: &SemanticMatchResult,
    weights: &Weights,
    thresholds: &crate::config::Thresholds,
) -> PipelineResult<FinalScore> {
    score_at_year(resume, jd, result, weights, thresholds, chrono::Utc::now().year())
}

/// Testable variant taking the "current year" explicitly for deterministic
/// recency-weight math.
pub fn score_at_year(
    resume: &ParsedResume,
    jd: &ParsedJobDescription,
    result: &SemanticMatchResult,
    weights: &Weights,
    thresholds: &crate::config::Thresholds,
    current_year: i32,
) -> PipelineResult<FinalScore> {
    weights.validate()?;

    let hard = hard_skills_score(resume, jd, result);
    let soft = soft_skills_score(resume, jd);
    let (experience, years_sub, relevance_sub) = experience_score(resume, jd, current_year);
    let (education, level_sub, edu_relevance_sub) = education_score(resume, jd);
    let semantic = result.overall_similarity;

    let overall = 100.0
        * (weights.hard_skills * hard
            + weights.soft_skills * soft
            + weights.experience * experience
            + weights.education * education
            + weights.semantic_match * semantic);

    let (overall_confidence, confidence_level) = confidence_level_of(resume.parsing_confidence, resume, jd, result);

    let skills_matched_count = result.skill_matches.len();
    let skills_missing_count = result.missing_skills.len();

    let mut suitability = suitability_from_overall(overall, thresholds);

    if skills_missing_count > skills_matched_count {
        suitability = downgrade(suitability);
    }

    let strong_component = experience >= 0.90 || hard >= 0.95 || education >= 0.90;
    if strong_component && suitability == Suitability::Low && overall >= 50.0 {
        suitability = Suitability::Medium;
    }

    if overall_confidence * 100.0 < 60.0 && suitability == Suitability::High {
        suitability = Suitability::Medium;
    }

    let detailed_scores = DetailedScores {
        hard_skills_score: hard * 100.0,
        soft_skills_score: soft * 100.0,
        experience_score: experience * 100.0,
        education_score: education * 100.0,
        semantic_score: semantic * 100.0,
        technical_sub_score: (resume.skills.technical_skills.len() as f64 / 10.0 * 100.0).min(100.0),
        domain_sub_score: (resume.skills.domain_expertise.len() as f64 / 5.0 * 100.0).min(100.0),
        tools_sub_score: (resume.skills.tools_platforms.len() as f64 / 8.0 * 100.0).min(100.0),
        years_sub_score: years_sub * 100.0,
        relevance_sub_score: relevance_sub * 100.0,
        education_level_sub_score: level_sub * 100.0,
        education_relevance_sub_score: edu_relevance_sub * 100.0,
        skills_matched_count,
        skills_missing_count,
        parsing_confidence: resume.parsing_confidence * 100.0,
        matching_confidence: if result.skill_matches.is_empty() {
            50.0
        } else {
            result.skill_matches.iter().map(|m| m.confidence).sum::<f64>() / result.skill_matches.len() as f64 * 100.0
        },
        overall_confidence: overall_confidence * 100.0,
    };

    Ok(FinalScore {
        overall_score: overall,
        detailed_scores,
        suitability,
        percentile_rank: None,
        confidence_level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Thresholds;
    use crate::models::{ContactInfo, SkillProfile};

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
            missing_skills: Vec::new(),
            additional_skills: Vec::new(),
            category_similarities: Default::default(),
            embedding_similarity: 0.0,
            text_similarity: 0.0,
        }
    }

    #[test]
    fn no_required_skills_yields_half_hard_skills_score() {
        let resume = empty_resume();
        let jd = empty_jd();
        let result = empty_match();
        let value = hard_skills_score(&resume, &jd, &result);
        assert_eq!(value, 0.5);
    }

    #[test]
    fn invalid_weights_returns_error() {
        let resume = empty_resume();
        let jd = empty_jd();
        let result = empty_match();
        let bad_weights = Weights {
            hard_skills: 0.5,
            soft_skills: 0.5,
            experience: 0.5,
            education: 0.5,
            semantic_match: 0.5,
        };
        let outcome = score(&resume, &jd, &result, &bad_weights, &Thresholds::default());
        assert!(outcome.is_err());
    }

    #[test]
    fn scores_are_bounded_zero_to_hundred() {
        let resume = empty_resume();
        let jd = empty_jd();
        let result = empty_match();
        let final_score = score(&resume, &jd, &result, &Weights::default(), &Thresholds::default()).unwrap();
        assert!(final_score.overall_score >= 0.0 && final_score.overall_score <= 100.0);
        assert!(final_score.detailed_scores.hard_skills_score >= 0.0);
    }

    #[test]
    fn zero_years_required_defaults_to_two() {
        assert_eq!(years_score(0.0, 0.0), 0.0);
        assert!(years_score(2.0, 0.0) >= 1.0);
    }

    #[test]
    fn candidate_exactly_matching_required_years_scores_full() {
        assert_eq!(years_score(5.0, 5.0), 1.0);
    }
}
