//! C3: Job Structurer — segments a job posting into summary,
//! responsibilities, requirements, preferred qualifications, and benefits,
//! then extracts required/preferred skills, years required, education
//! requirements, remote flag, and urgency (§4.3). Never fails.

use crate::models::{JobMetadata, ParsedJobDescription, UrgencyLevel};
use crate::skills_data::SKILL_LOOKUP;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

static BULLET_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[•*\-◦▪▫]\s*|^\d+\.?\s+").unwrap());

static YEARS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\+?\s*(?:to\s+(\d+))?\s*years?|minimum\s+(\d+)\s+years?|at least\s+(\d+)\s+years?")
        .unwrap()
});

const EDUCATION_KEYWORDS: [&str; 11] = [
    "bachelor", "master", "phd", "doctorate", "associate", "diploma", "bs", "ba", "ms", "ma",
    "mba",
];
const REMOTE_KEYWORDS: [&str; 5] = ["remote", "work from home", "wfh", "distributed", "telecommute"];
const HIGH_URGENCY_KEYWORDS: [&str; 4] = ["urgent", "immediate", "asap", "critical"];
const MEDIUM_URGENCY_KEYWORDS: [&str; 3] = ["fast-paced", "quickly", "rapid"];

fn section_keywords() -> HashMap<&'static str, &'static [&'static str]> {
    let mut map: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
    map.insert("summary", &["summary", "overview", "about"]);
    map.insert(
        "responsibilities",
        &["responsibilities", "duties", "what you'll do"],
    );
    map.insert(
        "requirements",
        &["requirements", "qualifications", "must have"],
    );
    map.insert("preferred", &["preferred", "nice to have", "bonus"]);
    map.insert("benefits", &["benefits", "perks", "compensation"]);
    map
}

struct Section {
    lines: Vec<String>,
}

fn detect_sections(text: &str) -> HashMap<&'static str, Section> {
    let keywords = section_keywords();
    let mut sections: HashMap<&'static str, Section> = HashMap::new();
    let mut current: Option<&'static str> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        let word_count = trimmed.split_whitespace().count();
        let lower = trimmed.to_lowercase();

        let mut matched_section = None;
        if word_count > 0 && word_count <= 4 {
            for (&name, kws) in keywords.iter() {
                if kws.iter().any(|kw| lower.contains(kw)) {
                    matched_section = Some(name);
                    break;
                }
            }
        }

        if let Some(name) = matched_section {
            current = Some(name);
            sections.entry(name).or_insert_with(|| Section { lines: Vec::new() });
            continue;
        }

        if let Some(name) = current {
            sections
                .entry(name)
                .or_insert_with(|| Section { lines: Vec::new() })
                .lines
                .push(trimmed.to_string());
        }
    }

    sections
}

/// Splits section content into bullets: marker-prefixed lines become one
/// bullet each; unmarked lines longer than 3 words are retained verbatim.
fn split_bullets(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| {
            let stripped = BULLET_PREFIX_RE.replace(line, "").trim().to_string();
            if BULLET_PREFIX_RE.is_match(line) {
                if stripped.is_empty() {
                    None
                } else {
                    Some(stripped)
                }
            } else if line.split_whitespace().count() > 3 {
                Some(line.clone())
            } else {
                None
            }
        })
        .collect()
}

fn matched_skills(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (term, (canonical, _category)) in SKILL_LOOKUP.iter() {
        if lower.contains(term.as_str()) && seen.insert(*canonical) {
            out.push(canonical.to_string());
        }
    }
    out
}

fn extract_years(text: &str) -> Option<i32> {
    let caps = YEARS_RE.captures(text)?;
    for idx in [1, 3, 4] {
        if let Some(m) = caps.get(idx) {
            if let Ok(n) = m.as_str().parse::<i32>() {
                return Some(n);
            }
        }
    }
    None
}

fn extract_education_requirements(text: &str) -> Vec<String> {
    text.split(|c| c == '.' || c == '\n')
        .map(|s| s.trim())
        .filter(|sentence| {
            let lower = sentence.to_lowercase();
            !sentence.is_empty()
                && EDUCATION_KEYWORDS
                    .iter()
                    .any(|kw| lower.split(|c: char| !c.is_alphanumeric()).any(|w| w == *kw))
        })
        .map(|s| s.to_string())
        .collect()
}

fn detect_remote(lower: &str) -> bool {
    REMOTE_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

fn detect_urgency(lower: &str) -> UrgencyLevel {
    if HIGH_URGENCY_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        UrgencyLevel::High
    } else if MEDIUM_URGENCY_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        UrgencyLevel::Medium
    } else {
        UrgencyLevel::Low
    }
}

/// `StructureJob(text, metadata) → ParsedJobDescription` from the core API.
/// `metadata` fields, when set, override any value this function would
/// otherwise have parsed.
pub fn structure(text: &str, metadata: &JobMetadata) -> ParsedJobDescription {
    let sections = detect_sections(text);
    let lower = text.to_lowercase();

    let summary = sections.get("summary").map(|s| s.lines.join(" ")).filter(|s| !s.is_empty());
    let responsibilities = sections
        .get("responsibilities")
        .map(|s| split_bullets(&s.lines))
        .unwrap_or_default();
    let requirements = sections
        .get("requirements")
        .map(|s| split_bullets(&s.lines))
        .unwrap_or_default();
    let preferred_qualifications = sections
        .get("preferred")
        .map(|s| split_bullets(&s.lines))
        .unwrap_or_default();
    let benefits = sections
        .get("benefits")
        .map(|s| split_bullets(&s.lines))
        .unwrap_or_default();

    let required_scope = format!("{} {}", text, requirements.join(" "));
    let required_skills = matched_skills(&required_scope);
    let preferred_skills = matched_skills(&preferred_qualifications.join(" "));

    let required_experience_years = extract_years(text);
    let education_requirements = extract_education_requirements(text);
    let remote_allowed = detect_remote(&lower);
    let urgency_level = detect_urgency(&lower);

    ParsedJobDescription {
        title: metadata.title.clone(),
        company: metadata.company.clone(),
        location: metadata.location.clone(),
        department: metadata.department.clone(),
        job_type: None,
        salary_range: None,
        experience_required_text: required_experience_years.map(|y| format!("{} years", y)),
        summary,
        responsibilities,
        requirements,
        preferred_qualifications,
        benefits,
        required_skills,
        preferred_skills,
        required_experience_years,
        education_requirements,
        remote_allowed,
        urgency_level,
        raw_content: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Overview\nWe are hiring a backend engineer.\n\nRequirements\n- 5+ years of experience\n- Strong Python and Django skills\n- Bachelor's degree in Computer Science required\n\nPreferred\n- AWS and Docker experience\n\nBenefits\n- Remote work available\n- Urgent hiring need";

    #[test]
    fn extracts_required_skills_from_requirements() {
        let jd = structure(SAMPLE, &JobMetadata::default());
        assert!(jd.required_skills.contains(&"python".to_string()));
        assert!(jd.required_skills.contains(&"django".to_string()));
    }

    #[test]
    fn extracts_preferred_skills_separately() {
        let jd = structure(SAMPLE, &JobMetadata::default());
        assert!(jd.preferred_skills.contains(&"aws".to_string()));
    }

    #[test]
    fn extracts_years_required() {
        let jd = structure(SAMPLE, &JobMetadata::default());
        assert_eq!(jd.required_experience_years, Some(5));
    }

    #[test]
    fn detects_education_requirement_sentence() {
        let jd = structure(SAMPLE, &JobMetadata::default());
        assert!(jd
            .education_requirements
            .iter()
            .any(|s| s.to_lowercase().contains("bachelor")));
    }

    #[test]
    fn detects_remote_and_urgency() {
        let jd = structure(SAMPLE, &JobMetadata::default());
        assert!(jd.remote_allowed);
        assert_eq!(jd.urgency_level, UrgencyLevel::High);
    }

    #[test]
    fn metadata_overrides_parsed_values() {
        let metadata = JobMetadata {
            title: Some("Staff Engineer".to_string()),
            company: Some("Acme".to_string()),
            location: None,
            department: None,
        };
        let jd = structure(SAMPLE, &metadata);
        assert_eq!(jd.title.as_deref(), Some("Staff Engineer"));
        assert_eq!(jd.company.as_deref(), Some("Acme"));
    }

    #[test]
    fn no_required_skills_yields_empty_list() {
        let jd = structure(
            "We need someone reliable and kind to join our warm team.",
            &JobMetadata::default(),
        );
        assert!(jd.required_skills.is_empty());
        assert_eq!(jd.required_experience_years, None);
    }
}
