//! Transformation rule list
//!
//! Declarative bindings of file matchers to processor pipelines, consumed by
//! the bundler to decide how each source file is handled. The list order is
//! fixed: the lint rule always precedes the transpile rule for script files.

mod exclude;

pub use exclude::{ExcludePolicy, CORE_PACKAGE, DEPENDENCY_DIR_MARKER};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::AssembleError;

/// When the rule runs relative to the normal processing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStage {
    Pre,
    Normal,
}

/// Which exclusion predicate a rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Exclusion {
    None,
    Lint,
    Transpile,
}

/// One named processing step with its configuration.
#[derive(Debug, Clone, Serialize)]
pub struct LoaderSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

impl LoaderSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            options: Value::Null,
        }
    }

    pub fn with_options(name: &str, options: Value) -> Self {
        Self {
            name: name.to_string(),
            options,
        }
    }
}

/// A file-type transformation rule: matcher, exclusion, processor chain.
#[derive(Debug, Clone)]
pub struct TransformRule {
    pub name: String,
    pub stage: RuleStage,
    pub exclusion: Exclusion,
    pub loaders: Vec<LoaderSpec>,
    patterns: Vec<String>,
    matcher: GlobSet,
    policy: ExcludePolicy,
}

impl TransformRule {
    fn new(
        name: &str,
        stage: RuleStage,
        patterns: &[&str],
        exclusion: Exclusion,
        policy: &ExcludePolicy,
        loaders: Vec<LoaderSpec>,
    ) -> Result<Self, AssembleError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern)?);
        }

        Ok(Self {
            name: name.to_string(),
            stage,
            exclusion,
            loaders,
            patterns: patterns.iter().map(|s| s.to_string()).collect(),
            matcher: builder.build()?,
            policy: policy.clone(),
        })
    }

    /// Matcher patterns for this rule.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Whether the matcher covers this path.
    pub fn matches(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }

    /// Whether the rule's exclusion predicate skips this path.
    pub fn excluded(&self, path: &str) -> bool {
        match self.exclusion {
            Exclusion::None => false,
            Exclusion::Lint => self.policy.lint_excluded(path),
            Exclusion::Transpile => self.policy.transpile_excluded(path),
        }
    }

    /// Whether the rule processes this path: matched and not excluded.
    pub fn applies_to(&self, path: &str) -> bool {
        self.matches(path) && !self.excluded(path)
    }

    /// Declarative form for the consuming bundler.
    pub fn to_value(&self) -> Value {
        json!({
            "name": self.name,
            "stage": self.stage,
            "test": self.patterns,
            "exclude": self.exclusion,
            "use": self.loaders,
        })
    }
}

const SCRIPT_PATTERNS: &[&str] = &["**/*.js", "**/*.jsx"];

/// Build the fixed ordered rule list from the exclusion policy.
pub fn rule_list(policy: &ExcludePolicy) -> Result<Vec<TransformRule>, AssembleError> {
    Ok(vec![
        TransformRule::new(
            "scripts-lint",
            RuleStage::Pre,
            SCRIPT_PATTERNS,
            Exclusion::Lint,
            policy,
            vec![LoaderSpec::with_options(
                "lint",
                json!({
                    "configFile": "./.eslintrc.json",
                    "ignorePath": "./.eslintignore",
                }),
            )],
        )?,
        TransformRule::new(
            "scripts-transpile",
            RuleStage::Normal,
            SCRIPT_PATTERNS,
            Exclusion::Transpile,
            policy,
            vec![LoaderSpec::with_options(
                "transpile",
                json!({
                    "cacheDirectory": true,
                    "presets": ["es2015", "react"],
                    "plugins": ["transform-object-rest-spread"],
                }),
            )],
        )?,
        TransformRule::new(
            "markup",
            RuleStage::Normal,
            &["**/*.html"],
            Exclusion::None,
            policy,
            vec![LoaderSpec::new("markup")],
        )?,
        TransformRule::new(
            "styles-css",
            RuleStage::Normal,
            &["**/*.css"],
            Exclusion::None,
            policy,
            vec![LoaderSpec::new("style"), LoaderSpec::new("css")],
        )?,
        TransformRule::new(
            "styles-less",
            RuleStage::Normal,
            &["**/*.less"],
            Exclusion::None,
            policy,
            vec![
                LoaderSpec::new("style"),
                LoaderSpec::new("css"),
                LoaderSpec::new("less"),
            ],
        )?,
        TransformRule::new(
            "styles-sass",
            RuleStage::Normal,
            &["**/*.scss"],
            Exclusion::None,
            policy,
            vec![
                LoaderSpec::new("style"),
                LoaderSpec::new("css"),
                LoaderSpec::new("sass"),
            ],
        )?,
        TransformRule::new(
            "data-json",
            RuleStage::Normal,
            &["**/*.json"],
            Exclusion::None,
            policy,
            vec![LoaderSpec::new("json")],
        )?,
        TransformRule::new(
            "binary-assets",
            RuleStage::Normal,
            &[
                "**/*.png",
                "**/*.gif",
                "**/*.jpeg",
                "**/*.jpg",
                "**/*.woff",
                "**/*.woff2",
                "**/*.eot",
                "**/*.ttf",
                "**/*.svg",
            ],
            Exclusion::None,
            policy,
            vec![LoaderSpec::new("file")],
        )?,
        TransformRule::new(
            "markup-templates",
            RuleStage::Normal,
            &["**/*.tpl"],
            Exclusion::None,
            policy,
            vec![LoaderSpec::new("template"), LoaderSpec::new("markup")],
        )?,
    ])
}
