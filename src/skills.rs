//! C4: Skill Extractor — four orthogonal strategies merged by
//! (canonical_name, category), keeping the highest-confidence extraction.

use crate::backends::NullNlpBackend;
use crate::backends::NlpBackend;
use crate::models::{ExtractedSkill, SkillBucket, SkillCategory, SkillProfile};
use crate::skills_data::SKILL_LOOKUP;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

const SKILL_SECTION_KEYWORDS: [&str; 4] = ["skills", "technologies", "experience", "projects"];

static PROG_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)\b(python|java|javascript|typescript|c\+\+|c#|php|ruby|go|rust)\b")
            .unwrap(),
        Regex::new(r"(?i)\b(kotlin|swift|scala|matlab|perl|bash|powershell)\b").unwrap(),
    ]
});

static FRAMEWORK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)\b(react|angular|vue)(?:\.js)?\b").unwrap(),
        Regex::new(r"(?i)\b(django|flask|spring|express)(?:\s+(?:boot|framework))?\b").unwrap(),
        Regex::new(r"(?i)\b(tensorflow|pytorch|keras|scikit-learn)\b").unwrap(),
    ]
});

static CONTEXTUAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)(?:experience (?:with|in)|proficient (?:in|with)|skilled (?:in|with)|expertise (?:in|with))\s+([^,.\n]+)").unwrap(),
        Regex::new(r"(?i)(?:technologies:|skills:|tools:)\s*([^.\n]+)").unwrap(),
        Regex::new(r"(?i)(?:worked with|used|implemented|developed using)\s+([^,.\n]+)").unwrap(),
        Regex::new(r"(?i)(?:programming languages?|technologies?|frameworks?|tools?):\s*([^.\n]+)").unwrap(),
    ]
});

static CERT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)(AWS|Azure|Google Cloud|GCP)\s+(Certified|Certification)").unwrap(),
        Regex::new(r"(?i)(PMP|CISSP|CISM|CISA)\s*(Certified|Certification)?").unwrap(),
        Regex::new(r"(?i)(Scrum Master|Product Owner|Agile)\s*(Certified|Certification)").unwrap(),
        Regex::new(r"(?i)(Oracle|Microsoft|Cisco|CompTIA)\s+\w+\s*(Certified|Certification)")
            .unwrap(),
    ]
});

struct RawSkill {
    name: &'static str,
    category: SkillCategory,
    confidence: f64,
    context: String,
}

fn extract_context(text: &str, position: usize, skill_len: usize) -> String {
    let start = position.saturating_sub(50);
    let end = (position + skill_len + 50).min(text.len());
    if start >= end || start > text.len() {
        return String::new();
    }
    text[start..end].trim().chars().take(100).collect()
}

fn dictionary_strategy(text: &str) -> Vec<RawSkill> {
    let lower = text.to_lowercase();
    let mut out = Vec::new();
    for (term, (canonical, category)) in SKILL_LOOKUP.iter() {
        if let Some(pos) = lower.find(term.as_str()) {
            out.push(RawSkill {
                name: canonical,
                category: *category,
                confidence: dictionary_confidence(term, &lower),
                context: extract_context(text, pos, term.len()),
            });
        }
    }
    out
}

fn dictionary_confidence(term: &str, lower_text: &str) -> f64 {
    let mut confidence = 0.80_f64;
    let count = lower_text.matches(term).count();
    if count > 1 {
        confidence += (0.05 * (count as f64 - 1.0)).min(0.2);
    }
    for section in SKILL_SECTION_KEYWORDS {
        if let Some(section_pos) = lower_text.find(section) {
            let window_end = (section_pos + 200).min(lower_text.len());
            if lower_text[section_pos..window_end].contains(term) {
                confidence += 0.1;
                break;
            }
        }
    }
    confidence.min(1.0)
}

fn pattern_strategy(text: &str) -> Vec<RawSkill> {
    let mut out = Vec::new();
    for pattern in PROG_PATTERNS.iter() {
        for m in pattern.captures_iter(text) {
            let matched = m.get(1).unwrap();
            let lower = matched.as_str().to_lowercase();
            if let Some((canonical, category)) = SKILL_LOOKUP.get(&lower) {
                out.push(RawSkill {
                    name: canonical,
                    category: *category,
                    confidence: 0.9,
                    context: extract_context(text, matched.start(), matched.len()),
                });
            }
        }
    }
    for pattern in FRAMEWORK_PATTERNS.iter() {
        for m in pattern.captures_iter(text) {
            let matched = m.get(1).unwrap();
            let lower = matched.as_str().to_lowercase();
            if let Some((canonical, category)) = SKILL_LOOKUP.get(&lower) {
                out.push(RawSkill {
                    name: canonical,
                    category: *category,
                    confidence: 0.85,
                    context: extract_context(text, matched.start(), matched.len()),
                });
            }
        }
    }
    out
}

fn nlp_strategy(text: &str, nlp: &dyn NlpBackend) -> Vec<RawSkill> {
    let mut out = Vec::new();
    for phrase in nlp.noun_chunks(text) {
        let lower = phrase.to_lowercase();
        let word_count = lower.split_whitespace().count();
        if word_count == 0 || word_count > 3 || lower.len() < 3 {
            continue;
        }
        if let Some((canonical, category)) = SKILL_LOOKUP.get(&lower) {
            let pos = text.to_lowercase().find(&lower).unwrap_or(0);
            out.push(RawSkill {
                name: canonical,
                category: *category,
                confidence: 0.75,
                context: extract_context(text, pos, lower.len()),
            });
        }
    }
    for token in nlp.tokenize(text) {
        if !matches!(token.ent_type.as_deref(), Some("ORG") | Some("PRODUCT")) {
            continue;
        }
        let lower = token.token.to_lowercase();
        if let Some((canonical, category)) = SKILL_LOOKUP.get(&lower) {
            let pos = text.to_lowercase().find(&lower).unwrap_or(0);
            out.push(RawSkill {
                name: canonical,
                category: *category,
                confidence: 0.70,
                context: extract_context(text, pos, lower.len()),
            });
        }
    }
    out
}

fn contextual_strategy(text: &str) -> Vec<RawSkill> {
    let mut out = Vec::new();
    for pattern in CONTEXTUAL_PATTERNS.iter() {
        for m in pattern.captures_iter(text) {
            let skill_text = m.get(1).unwrap().as_str().trim();
            for part in skill_text.split(|c| c == ',' || c == ';' || c == '|' || c == '&') {
                let clean = part.trim().to_lowercase();
                if clean.is_empty() {
                    continue;
                }
                if let Some((canonical, category)) = SKILL_LOOKUP.get(&clean) {
                    out.push(RawSkill {
                        name: canonical,
                        category: *category,
                        confidence: 0.80,
                        context: skill_text.chars().take(100).collect(),
                    });
                }
            }
        }
    }
    out
}

fn merge(raw: Vec<RawSkill>) -> Vec<ExtractedSkill> {
    let mut best: HashMap<(String, SkillCategory), ExtractedSkill> = HashMap::new();
    for skill in raw {
        let key = (skill.name.to_lowercase(), skill.category);
        best.entry(key)
            .and_modify(|existing| {
                if skill.confidence > existing.confidence {
                    existing.confidence = skill.confidence;
                    existing.context = skill.context.clone();
                }
            })
            .or_insert_with(|| ExtractedSkill {
                name: skill.name.to_string(),
                category: skill.category,
                confidence: skill.confidence,
                context: skill.context,
                aliases: Vec::new(),
                proficiency: None,
            });
    }
    best.into_values().collect()
}

fn extract_certifications(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for pattern in CERT_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            out.push(m.as_str().trim().to_string());
        }
    }
    out
}

fn categorize(skills: Vec<ExtractedSkill>) -> SkillProfile {
    let mut profile = SkillProfile::default();
    for skill in skills {
        match skill.category.bucket() {
            SkillBucket::Soft => profile.soft_skills.push(skill),
            SkillBucket::ToolsPlatforms => profile.tools_platforms.push(skill),
            SkillBucket::DomainExpertise => profile.domain_expertise.push(skill),
            SkillBucket::Technical => profile.technical_skills.push(skill),
        }
    }
    profile
        .skill_categories
        .insert("technical_skills".into(), names(&profile.technical_skills));
    profile
        .skill_categories
        .insert("soft_skills".into(), names(&profile.soft_skills));
    profile.skill_categories.insert(
        "domain_expertise".into(),
        names(&profile.domain_expertise),
    );
    profile
        .skill_categories
        .insert("tools_platforms".into(), names(&profile.tools_platforms));

    let non_empty = [
        !profile.technical_skills.is_empty(),
        !profile.soft_skills.is_empty(),
        !profile.domain_expertise.is_empty(),
        !profile.tools_platforms.is_empty(),
    ]
    .iter()
    .filter(|x| **x)
    .count();
    profile.skill_diversity_score = (non_empty as f64 / 4.0).min(1.0);
    profile.total_skills_count = profile.technical_skills.len()
        + profile.soft_skills.len()
        + profile.domain_expertise.len()
        + profile.tools_platforms.len();
    profile
}

fn names(skills: &[ExtractedSkill]) -> Vec<String> {
    skills.iter().map(|s| s.name.clone()).collect()
}

/// `ExtractSkills(text) -> SkillProfile` from the core API, with the NLP
/// tier short-circuited by a null backend (no capability injected).
pub fn extract_skills(text: &str) -> SkillProfile {
    extract_skills_with_backend(text, &NullNlpBackend)
}

pub fn extract_skills_with_backend(text: &str, nlp: &dyn NlpBackend) -> SkillProfile {
    let mut raw = Vec::new();
    raw.extend(dictionary_strategy(text));
    raw.extend(pattern_strategy(text));
    raw.extend(nlp_strategy(text, nlp));
    raw.extend(contextual_strategy(text));

    let mut profile = categorize(merge(raw));
    profile.certifications = extract_certifications(text);
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dictionary_closure_for_every_canonical_skill() {
        for entry in crate::skills_data::SKILL_DICTIONARY.iter() {
            let alias = entry.aliases.first().copied().unwrap_or(entry.canonical);
            let profile = extract_skills(alias);
            let found = profile
                .all_skills()
                .find(|s| s.name == entry.canonical)
                .unwrap_or_else(|| panic!("missing {} from alias {}", entry.canonical, alias));
            assert_eq!(found.category, entry.category);
        }
    }

    #[test]
    fn repeated_mentions_boost_confidence() {
        let profile = extract_skills("Python Python Python developer, experienced in Python.");
        let py = profile
            .all_skills()
            .find(|s| s.name == "python")
            .expect("python found");
        assert!(py.confidence > 0.80);
    }

    #[test]
    fn certifications_are_extracted() {
        let profile = extract_skills("I hold an AWS Certified credential and a PMP Certified.");
        assert!(profile
            .certifications
            .iter()
            .any(|c| c.to_lowercase().contains("aws")));
    }

    #[test]
    fn diversity_score_reflects_non_empty_buckets() {
        let profile = extract_skills("python java leadership aws ios");
        assert!(profile.skill_diversity_score > 0.5);
    }

    #[test]
    fn empty_text_yields_empty_profile() {
        let profile = extract_skills("");
        assert_eq!(profile.total_skills_count, 0);
        assert_eq!(profile.skill_diversity_score, 0.0);
    }
}
