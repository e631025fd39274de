//! Black-box integration tests against the public API only, covering the
//! six seed end-to-end scenarios and cross-cutting invariants from the
//! evaluation pipeline's test plan. Mirrors the teacher's convention of
//! testing the crate from outside via `tests/`.

use resumatch_core::backends::Backends;
use resumatch_core::config::{Thresholds, Weights};
use resumatch_core::models::{JobMetadata, Suitability};
use resumatch_core::run_pipeline;

const STRONG_RESUME: &str = "Jane Doe
jane.doe@example.com | 555-123-4567

Summary
Experienced backend engineer with strong communication and leadership skills.

Skills
Python, Django, PostgreSQL, Docker, AWS, React, Redis

Experience
Senior Backend Engineer at Example Corp
01/2020 - Present
- Built scalable APIs with Python and Django
- Deployed services using Docker and AWS

Education
Massachusetts Institute Of Technology
Master of Science in Computer Science, 2019
GPA: 3.9
";

const STRONG_JD: &str = "Overview
We are looking for a backend engineer to join our platform team.

Requirements
- Python and Django required
- PostgreSQL required
- Docker required
- AWS required
- 5+ years of experience
- Master's degree preferred
- Excellent communication and leadership abilities required
";

fn strong_jd_metadata() -> JobMetadata {
    JobMetadata {
        title: Some("Senior Backend Engineer".to_string()),
        company: Some("Example Corp".to_string()),
        location: None,
        department: None,
    }
}

#[test]
fn scenario_1_strong_match() {
    let backends = Backends::default();
    let result = run_pipeline(
        STRONG_RESUME.as_bytes(),
        "text/plain",
        STRONG_JD,
        &strong_jd_metadata(),
        None,
        &backends,
    )
    .expect("pipeline should succeed");

    assert!(result.score.overall_score >= 80.0, "overall={}", result.score.overall_score);
    assert_eq!(result.score.suitability, Suitability::High);
    assert!(result.match_result.missing_skills.is_empty());
    assert!(result
        .match_result
        .additional_skills
        .iter()
        .any(|s| s == "react"));
    assert!(result
        .match_result
        .additional_skills
        .iter()
        .any(|s| s == "redis"));
}

#[test]
fn scenario_2_fuzzy_match_only() {
    let resume = "Alex Smith
alex@example.com

Skills
Javascript, PostgresQL, ReactJS

Experience
Engineer at SomeCo
01/2021 - Present
- Worked on frontend and backend systems
";
    let jd = "Requirements
- JavaScript required
- PostgreSQL required
- React required
";

    let backends = Backends::default();
    let result = run_pipeline(resume.as_bytes(), "text/plain", jd, &JobMetadata::default(), None, &backends)
        .expect("pipeline should succeed");

    let fuzzy_count = result
        .match_result
        .skill_matches
        .iter()
        .filter(|m| matches!(m.match_type, resumatch_core::models::MatchType::Fuzzy))
        .count();
    assert!(fuzzy_count >= 1);
    for m in result.match_result.skill_matches.iter() {
        if matches!(m.match_type, resumatch_core::models::MatchType::Fuzzy) {
            assert!(m.confidence >= 0.85);
        }
    }
    assert_ne!(result.score.suitability, Suitability::Low);
}

#[test]
fn scenario_3_critical_miss_downgrades_suitability() {
    let resume = "Sam Lee
sam@example.com

Skills
Python

Experience
Senior Staff Engineer at BigCo
01/2010 - Present
- Led platform architecture for a decade

Education
Stanford University
PhD in Computer Science, 2009
";
    let jd = "Requirements
- Python required
- Java required
- Go required
- Rust required
- Kubernetes required
- Terraform required
";

    let backends = Backends::default();
    let result = run_pipeline(resume.as_bytes(), "text/plain", jd, &JobMetadata::default(), None, &backends)
        .expect("pipeline should succeed");

    assert!(result.match_result.missing_skills.len() >= 4);
    assert_ne!(result.score.suitability, Suitability::High);
}

#[test]
fn scenario_5_zero_years_required_defaults_to_two() {
    let resume = "No Years
noyears@example.com

Skills
Python
";
    let jd = "Requirements
- Python required
";

    let backends = Backends::default();
    let result = run_pipeline(resume.as_bytes(), "text/plain", jd, &JobMetadata::default(), None, &backends)
        .expect("pipeline should succeed");

    assert_eq!(result.parsed_job.required_experience_years, None);
    assert!(result.score.detailed_scores.years_sub_score <= 50.0);
}

#[test]
fn scenario_6_invalid_weights_rejected() {
    let backends = Backends::default();
    let bad_weights = Weights {
        hard_skills: 0.5,
        soft_skills: 0.5,
        experience: 0.5,
        education: 0.5,
        semantic_match: 0.5,
    };
    let outcome = run_pipeline(
        STRONG_RESUME.as_bytes(),
        "text/plain",
        STRONG_JD,
        &JobMetadata::default(),
        Some(bad_weights),
        &backends,
    );
    assert!(outcome.is_err());
}

#[test]
fn overall_score_and_subscores_stay_in_bounds() {
    let backends = Backends::default();
    let result = run_pipeline(
        STRONG_RESUME.as_bytes(),
        "text/plain",
        STRONG_JD,
        &JobMetadata::default(),
        None,
        &backends,
    )
    .unwrap();

    let ds = &result.score.detailed_scores;
    for value in [
        result.score.overall_score,
        ds.hard_skills_score,
        ds.soft_skills_score,
        ds.experience_score,
        ds.education_score,
        ds.semantic_score,
    ] {
        assert!((0.0..=100.0).contains(&value), "value {} out of bounds", value);
    }
}

#[test]
fn match_set_laws_hold() {
    let backends = Backends::default();
    let result = run_pipeline(
        STRONG_RESUME.as_bytes(),
        "text/plain",
        STRONG_JD,
        &JobMetadata::default(),
        None,
        &backends,
    )
    .unwrap();

    let resume_names = result.parsed_resume.skills.all_skill_names();
    for m in &result.match_result.skill_matches {
        if let Some(resume_skill) = &m.resume_skill {
            assert!(resume_names.iter().any(|n| n.eq_ignore_ascii_case(resume_skill)));
        }
        let in_required_or_preferred = result.parsed_job.required_skills.iter().any(|s| s == &m.jd_skill)
            || result.parsed_job.preferred_skills.iter().any(|s| s == &m.jd_skill);
        assert!(in_required_or_preferred);
    }

    let matched_jd: std::collections::HashSet<&String> =
        result.match_result.skill_matches.iter().map(|m| &m.jd_skill).collect();
    for missing in &result.match_result.missing_skills {
        assert!(!matched_jd.contains(missing));
    }

    let matched_resume: std::collections::HashSet<&String> = result
        .match_result
        .skill_matches
        .iter()
        .filter_map(|m| m.resume_skill.as_ref())
        .collect();
    for additional in &result.match_result.additional_skills {
        assert!(!matched_resume.contains(additional));
    }
}

#[test]
fn idempotent_evaluation() {
    let backends = Backends::default();
    let first = run_pipeline(
        STRONG_RESUME.as_bytes(),
        "text/plain",
        STRONG_JD,
        &JobMetadata::default(),
        None,
        &backends,
    )
    .unwrap();
    let second = run_pipeline(
        STRONG_RESUME.as_bytes(),
        "text/plain",
        STRONG_JD,
        &JobMetadata::default(),
        None,
        &backends,
    )
    .unwrap();

    assert_eq!(first.parsed_resume, second.parsed_resume);
    assert_eq!(first.parsed_job, second.parsed_job);
    assert_eq!(first.score, second.score);
}

#[test]
fn round_trip_serialization_preserves_evaluation_result() {
    let backends = Backends::default();
    let result = run_pipeline(
        STRONG_RESUME.as_bytes(),
        "text/plain",
        STRONG_JD,
        &JobMetadata::default(),
        None,
        &backends,
    )
    .unwrap();

    let json = serde_json::to_string(&result).unwrap();
    let back: resumatch_core::EvaluationResult = serde_json::from_str(&json).unwrap();
    assert_eq!(result, back);
}

#[test]
fn empty_resume_text_is_extraction_failure() {
    let backends = Backends::default();
    let outcome = run_pipeline(b"   ", "text/plain", STRONG_JD, &JobMetadata::default(), None, &backends);
    assert!(outcome.is_err());
}

#[test]
fn jd_with_no_required_skills_yields_midpoint_hard_skills_score() {
    let jd = "Summary\nWe are a growing company looking for great people.";
    let backends = Backends::default();
    let result = run_pipeline(
        STRONG_RESUME.as_bytes(),
        "text/plain",
        jd,
        &JobMetadata::default(),
        None,
        &backends,
    )
    .unwrap();
    assert_eq!(result.score.detailed_scores.hard_skills_score, 50.0);
}

#[test]
fn weights_exactly_one_component_still_produces_bounded_score() {
    let backends = Backends::default();
    let weights = Weights {
        hard_skills: 1.0,
        soft_skills: 0.0,
        experience: 0.0,
        education: 0.0,
        semantic_match: 0.0,
    };
    let result = run_pipeline(
        STRONG_RESUME.as_bytes(),
        "text/plain",
        STRONG_JD,
        &JobMetadata::default(),
        Some(weights),
        &backends,
    )
    .unwrap();
    assert!((0.0..=100.0).contains(&result.score.overall_score));
}

#[test]
fn thresholds_default_matches_documented_values() {
    let thresholds = Thresholds::default();
    assert_eq!(thresholds.high, 80.0);
    assert_eq!(thresholds.medium, 60.0);
}
