use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Category a canonical skill belongs to in the skill dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    ProgrammingLanguages,
    WebTechnologies,
    Databases,
    CloudPlatforms,
    DataScience,
    MobileDevelopment,
    DevopsTools,
    SoftSkills,
}

impl SkillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProgrammingLanguages => "programming_languages",
            Self::WebTechnologies => "web_technologies",
            Self::Databases => "databases",
            Self::CloudPlatforms => "cloud_platforms",
            Self::DataScience => "data_science",
            Self::MobileDevelopment => "mobile_development",
            Self::DevopsTools => "devops_tools",
            Self::SoftSkills => "soft_skills",
        }
    }

    /// Which `SkillProfile` bucket this category rolls up into.
    pub fn bucket(&self) -> SkillBucket {
        match self {
            Self::SoftSkills => SkillBucket::Soft,
            Self::CloudPlatforms | Self::DevopsTools => SkillBucket::ToolsPlatforms,
            Self::DataScience | Self::MobileDevelopment => SkillBucket::DomainExpertise,
            Self::ProgrammingLanguages | Self::WebTechnologies | Self::Databases => {
                SkillBucket::Technical
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillBucket {
    Technical,
    Soft,
    DomainExpertise,
    ToolsPlatforms,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EducationEntry {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub location: Option<String>,
    pub graduation_year: Option<i32>,
    pub gpa: Option<f64>,
    pub honors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkExperienceEntry {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Vec<String>,
    pub technologies: Vec<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectEntry {
    pub title: String,
    pub description: Vec<String>,
    pub technologies: Vec<String>,
    pub url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedSkill {
    pub name: String,
    pub category: SkillCategory,
    pub confidence: f64,
    pub context: String,
    pub aliases: Vec<String>,
    pub proficiency: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SkillProfile {
    pub technical_skills: Vec<ExtractedSkill>,
    pub soft_skills: Vec<ExtractedSkill>,
    pub domain_expertise: Vec<ExtractedSkill>,
    pub tools_platforms: Vec<ExtractedSkill>,
    pub certifications: Vec<String>,
    pub skill_categories: HashMap<String, Vec<String>>,
    pub total_skills_count: usize,
    pub skill_diversity_score: f64,
}

impl SkillProfile {
    /// All skill names across the four buckets, in bucket order.
    pub fn all_skill_names(&self) -> Vec<String> {
        self.technical_skills
            .iter()
            .chain(self.soft_skills.iter())
            .chain(self.domain_expertise.iter())
            .chain(self.tools_platforms.iter())
            .map(|s| s.name.clone())
            .collect()
    }

    pub fn all_skills(&self) -> impl Iterator<Item = &ExtractedSkill> {
        self.technical_skills
            .iter()
            .chain(self.soft_skills.iter())
            .chain(self.domain_expertise.iter())
            .chain(self.tools_platforms.iter())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedResume {
    pub contact: ContactInfo,
    pub summary: Option<String>,
    pub skills: SkillProfile,
    pub education: Vec<EducationEntry>,
    pub work_experience: Vec<WorkExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    pub certifications: Vec<String>,
    pub languages: Vec<String>,
    pub awards: Vec<String>,
    pub total_experience_years: Option<f64>,
    pub raw_text: String,
    pub parsing_confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JobMetadata {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedJobDescription {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub department: Option<String>,
    pub job_type: Option<String>,
    pub salary_range: Option<String>,
    pub experience_required_text: Option<String>,
    pub summary: Option<String>,
    pub responsibilities: Vec<String>,
    pub requirements: Vec<String>,
    pub preferred_qualifications: Vec<String>,
    pub benefits: Vec<String>,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub required_experience_years: Option<i32>,
    pub education_requirements: Vec<String>,
    pub remote_allowed: bool,
    pub urgency_level: UrgencyLevel,
    pub raw_content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Fuzzy,
    Semantic,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillMatch {
    pub skill_name: String,
    pub resume_skill: Option<String>,
    pub jd_skill: String,
    pub match_type: MatchType,
    pub confidence: f64,
    pub semantic_similarity: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SemanticMatchResult {
    pub overall_similarity: f64,
    pub skill_matches: Vec<SkillMatch>,
    pub missing_skills: Vec<String>,
    pub additional_skills: Vec<String>,
    pub category_similarities: HashMap<String, f64>,
    pub embedding_similarity: f64,
    pub text_similarity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailedScores {
    pub hard_skills_score: f64,
    pub soft_skills_score: f64,
    pub experience_score: f64,
    pub education_score: f64,
    pub semantic_score: f64,

    pub technical_sub_score: f64,
    pub domain_sub_score: f64,
    pub tools_sub_score: f64,
    pub years_sub_score: f64,
    pub relevance_sub_score: f64,
    pub education_level_sub_score: f64,
    pub education_relevance_sub_score: f64,

    pub skills_matched_count: usize,
    pub skills_missing_count: usize,

    pub parsing_confidence: f64,
    pub matching_confidence: f64,
    pub overall_confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suitability {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalScore {
    pub overall_score: f64,
    pub detailed_scores: DetailedScores,
    pub suitability: Suitability,
    pub percentile_rank: Option<f64>,
    pub confidence_level: ConfidenceLevel,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SkillGapAnalysis {
    pub critical_missing: Vec<String>,
    pub nice_to_have: Vec<String>,
    pub learning_resources: Vec<String>,
    pub alternative_skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackBundle {
    pub overall_assessment: String,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub specific_recommendations: Vec<String>,
    pub skill_gap_analysis: SkillGapAnalysis,
    pub career_advancement_tips: Vec<String>,
    pub interview_preparation_tips: Vec<String>,
    pub confidence_level: ConfidenceLevel,
}

/// The end-to-end convenience result produced by `pipeline::run_pipeline`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationResult {
    pub parsed_resume: ParsedResume,
    pub parsed_job: ParsedJobDescription,
    pub match_result: SemanticMatchResult,
    pub score: FinalScore,
    pub feedback: FeedbackBundle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_category_bucket_mapping() {
        assert_eq!(SkillCategory::SoftSkills.bucket(), SkillBucket::Soft);
        assert_eq!(
            SkillCategory::CloudPlatforms.bucket(),
            SkillBucket::ToolsPlatforms
        );
        assert_eq!(
            SkillCategory::DataScience.bucket(),
            SkillBucket::DomainExpertise
        );
        assert_eq!(
            SkillCategory::ProgrammingLanguages.bucket(),
            SkillBucket::Technical
        );
    }

    #[test]
    fn round_trip_final_score() {
        let score = FinalScore {
            overall_score: 82.5,
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
            suitability: Suitability::High,
            percentile_rank: None,
            confidence_level: ConfidenceLevel::High,
        };
        let json = serde_json::to_string(&score).unwrap();
        let back: FinalScore = serde_json::from_str(&json).unwrap();
        assert_eq!(score, back);
    }
}
