//! The fixed, versioned skill dictionary: canonical name, category, and
//! aliases for every skill the extractor recognizes. Reproduced verbatim
//! from the design reference so that dictionary matching and the reverse
//! alias lookup stay in lock-step with the rest of the pipeline.

use crate::models::SkillCategory;
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub struct SkillEntry {
    pub canonical: &'static str,
    pub category: SkillCategory,
    pub aliases: &'static [&'static str],
}

macro_rules! skill {
    ($canonical:expr, $category:expr, [$($alias:expr),* $(,)?]) => {
        SkillEntry { canonical: $canonical, category: $category, aliases: &[$($alias),*] }
    };
}

pub static SKILL_DICTIONARY: Lazy<Vec<SkillEntry>> = Lazy::new(|| {
    use SkillCategory::*;
    vec![
        // programming_languages
        skill!("python", ProgrammingLanguages, ["python", "py", "python3"]),
        skill!(
            "javascript",
            ProgrammingLanguages,
            ["javascript", "js", "ecmascript", "es6", "es2015"]
        ),
        skill!("java", ProgrammingLanguages, ["java", "jvm"]),
        skill!("typescript", ProgrammingLanguages, ["typescript", "ts"]),
        skill!(
            "c++",
            ProgrammingLanguages,
            ["c++", "cpp", "c plus plus"]
        ),
        skill!("c#", ProgrammingLanguages, ["c#", "csharp", "c sharp"]),
        skill!("php", ProgrammingLanguages, ["php", "php7", "php8"]),
        skill!("ruby", ProgrammingLanguages, ["ruby", "rb"]),
        skill!("go", ProgrammingLanguages, ["go", "golang"]),
        skill!("rust", ProgrammingLanguages, ["rust", "rust-lang"]),
        skill!("kotlin", ProgrammingLanguages, ["kotlin", "kt"]),
        skill!("swift", ProgrammingLanguages, ["swift", "swift5"]),
        skill!("scala", ProgrammingLanguages, ["scala"]),
        skill!("r", ProgrammingLanguages, ["r programming", "r language"]),
        skill!("matlab", ProgrammingLanguages, ["matlab"]),
        skill!("perl", ProgrammingLanguages, ["perl"]),
        skill!(
            "bash",
            ProgrammingLanguages,
            ["bash", "shell scripting", "bash scripting"]
        ),
        skill!("powershell", ProgrammingLanguages, ["powershell", "ps1"]),
        // web_technologies
        skill!("react", WebTechnologies, ["react", "reactjs", "react.js"]),
        skill!(
            "angular",
            WebTechnologies,
            ["angular", "angularjs", "angular2+"]
        ),
        skill!("vue", WebTechnologies, ["vue", "vue.js", "vuejs"]),
        skill!("html", WebTechnologies, ["html", "html5"]),
        skill!(
            "css",
            WebTechnologies,
            ["css", "css3", "cascading style sheets"]
        ),
        skill!("sass", WebTechnologies, ["sass", "scss"]),
        skill!("less", WebTechnologies, ["less css"]),
        skill!(
            "bootstrap",
            WebTechnologies,
            ["bootstrap", "bootstrap4", "bootstrap5"]
        ),
        skill!("tailwind", WebTechnologies, ["tailwind", "tailwindcss"]),
        skill!("jquery", WebTechnologies, ["jquery", "jquery ui"]),
        skill!(
            "node.js",
            WebTechnologies,
            ["node.js", "nodejs", "node js"]
        ),
        skill!(
            "express",
            WebTechnologies,
            ["express", "express.js", "expressjs"]
        ),
        skill!(
            "django",
            WebTechnologies,
            ["django", "django rest framework"]
        ),
        skill!("flask", WebTechnologies, ["flask", "flask-restful"]),
        skill!(
            "spring",
            WebTechnologies,
            ["spring", "spring boot", "spring framework"]
        ),
        skill!(
            "laravel",
            WebTechnologies,
            ["laravel", "laravel framework"]
        ),
        skill!(
            "rails",
            WebTechnologies,
            ["ruby on rails", "rails", "ror"]
        ),
        // databases
        skill!("mysql", Databases, ["mysql", "my sql"]),
        skill!(
            "postgresql",
            Databases,
            ["postgresql", "postgres", "psql"]
        ),
        skill!("mongodb", Databases, ["mongodb", "mongo"]),
        skill!("redis", Databases, ["redis"]),
        skill!(
            "elasticsearch",
            Databases,
            ["elasticsearch", "elastic search", "elk stack"]
        ),
        skill!("oracle", Databases, ["oracle database", "oracle db"]),
        skill!("sqlite", Databases, ["sqlite", "sqlite3"]),
        skill!(
            "cassandra",
            Databases,
            ["cassandra", "apache cassandra"]
        ),
        skill!("dynamodb", Databases, ["dynamodb", "dynamo db"]),
        skill!("neo4j", Databases, ["neo4j", "graph database"]),
        skill!(
            "influxdb",
            Databases,
            ["influxdb", "time series database"]
        ),
        // cloud_platforms
        skill!(
            "aws",
            CloudPlatforms,
            ["aws", "amazon web services", "ec2", "s3", "lambda", "rds"]
        ),
        skill!("azure", CloudPlatforms, ["azure", "microsoft azure"]),
        skill!(
            "gcp",
            CloudPlatforms,
            ["gcp", "google cloud platform", "google cloud"]
        ),
        skill!("kubernetes", CloudPlatforms, ["kubernetes", "k8s"]),
        skill!("docker", CloudPlatforms, ["docker", "containerization"]),
        skill!(
            "terraform",
            CloudPlatforms,
            ["terraform", "infrastructure as code"]
        ),
        skill!(
            "ansible",
            CloudPlatforms,
            ["ansible", "configuration management"]
        ),
        skill!("jenkins", CloudPlatforms, ["jenkins", "ci/cd"]),
        skill!("gitlab", CloudPlatforms, ["gitlab", "gitlab ci"]),
        skill!("circleci", CloudPlatforms, ["circleci", "circle ci"]),
        // data_science
        skill!("pandas", DataScience, ["pandas", "pd"]),
        skill!("numpy", DataScience, ["numpy", "np"]),
        skill!(
            "scikit-learn",
            DataScience,
            ["scikit-learn", "sklearn", "sci-kit learn"]
        ),
        skill!("tensorflow", DataScience, ["tensorflow", "tf"]),
        skill!("pytorch", DataScience, ["pytorch", "torch"]),
        skill!("keras", DataScience, ["keras"]),
        skill!("matplotlib", DataScience, ["matplotlib", "pyplot"]),
        skill!("seaborn", DataScience, ["seaborn", "sns"]),
        skill!("plotly", DataScience, ["plotly", "plotly dash"]),
        skill!(
            "jupyter",
            DataScience,
            ["jupyter", "jupyter notebook", "ipython"]
        ),
        skill!(
            "apache spark",
            DataScience,
            ["spark", "apache spark", "pyspark"]
        ),
        skill!("hadoop", DataScience, ["hadoop", "hdfs"]),
        skill!("tableau", DataScience, ["tableau"]),
        skill!("power bi", DataScience, ["power bi", "powerbi"]),
        skill!("r shiny", DataScience, ["shiny", "r shiny"]),
        // mobile_development
        skill!(
            "ios",
            MobileDevelopment,
            ["ios development", "ios", "iphone development"]
        ),
        skill!(
            "android",
            MobileDevelopment,
            ["android development", "android"]
        ),
        skill!(
            "react native",
            MobileDevelopment,
            ["react native", "react-native"]
        ),
        skill!("flutter", MobileDevelopment, ["flutter", "dart"]),
        skill!("xamarin", MobileDevelopment, ["xamarin"]),
        skill!("cordova", MobileDevelopment, ["cordova", "phonegap"]),
        skill!(
            "ionic",
            MobileDevelopment,
            ["ionic framework", "ionic"]
        ),
        // devops_tools
        skill!(
            "git",
            DevopsTools,
            ["git", "version control", "github", "gitlab"]
        ),
        skill!("svn", DevopsTools, ["svn", "subversion"]),
        skill!("maven", DevopsTools, ["maven", "apache maven"]),
        skill!("gradle", DevopsTools, ["gradle"]),
        skill!("webpack", DevopsTools, ["webpack", "module bundler"]),
        skill!("npm", DevopsTools, ["npm", "node package manager"]),
        skill!(
            "yarn",
            DevopsTools,
            ["yarn package manager", "yarn"]
        ),
        skill!(
            "pip",
            DevopsTools,
            ["pip", "python package installer"]
        ),
        // soft_skills
        skill!(
            "leadership",
            SoftSkills,
            ["leadership", "team leadership", "leading teams"]
        ),
        skill!(
            "communication",
            SoftSkills,
            ["communication", "public speaking", "presentation"]
        ),
        skill!(
            "problem solving",
            SoftSkills,
            ["problem solving", "analytical thinking", "troubleshooting"]
        ),
        skill!(
            "project management",
            SoftSkills,
            ["project management", "agile", "scrum", "kanban"]
        ),
        skill!(
            "teamwork",
            SoftSkills,
            ["teamwork", "collaboration", "cross-functional teams"]
        ),
        skill!(
            "adaptability",
            SoftSkills,
            ["adaptability", "flexibility", "learning agility"]
        ),
        skill!(
            "time management",
            SoftSkills,
            ["time management", "organization", "prioritization"]
        ),
        skill!(
            "creativity",
            SoftSkills,
            ["creativity", "innovation", "creative thinking"]
        ),
        skill!(
            "critical thinking",
            SoftSkills,
            ["critical thinking", "analysis", "evaluation"]
        ),
        skill!(
            "mentoring",
            SoftSkills,
            ["mentoring", "coaching", "training others"]
        ),
    ]
});

/// Reverse lookup: lowercase alias (or canonical name) → (canonical name, category).
pub static SKILL_LOOKUP: Lazy<HashMap<String, (&'static str, SkillCategory)>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for entry in SKILL_DICTIONARY.iter() {
        map.insert(
            entry.canonical.to_lowercase(),
            (entry.canonical, entry.category),
        );
        for alias in entry.aliases {
            map.insert(alias.to_lowercase(), (entry.canonical, entry.category));
        }
    }
    map
});

/// Canonical soft-skill names, used by the scoring engine to decide whether
/// a JD names any soft skills at all.
pub fn is_soft_skill(name: &str) -> bool {
    SKILL_LOOKUP
        .get(&name.to_lowercase())
        .map(|(_, cat)| matches!(cat, SkillCategory::SoftSkills))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_resolves_aliases_to_canonical() {
        let (canonical, category) = SKILL_LOOKUP.get("reactjs").expect("alias present");
        assert_eq!(*canonical, "react");
        assert_eq!(*category, SkillCategory::WebTechnologies);
    }

    #[test]
    fn lookup_resolves_canonical_names() {
        assert!(SKILL_LOOKUP.contains_key("python"));
        assert!(SKILL_LOOKUP.contains_key("aws"));
    }

    #[test]
    fn soft_skill_detection() {
        assert!(is_soft_skill("leadership"));
        assert!(!is_soft_skill("python"));
    }
}
