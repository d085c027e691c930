//! Turning a concrete project layout into a reusable template
//!
//! Generalization is delegated to an outside text-in/text-out service (an
//! LLM CLI, a script, ...). This module builds the request, cleans the reply
//! and guarantees a usable result: if the service fails or returns nothing,
//! the raw rendering is used instead.

use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use tracing::{info, warn};

use crate::error::GeneralizeError;

/// Environment variable carrying the detected project type to commands.
pub const PROJECT_TYPE_ENV: &str = "SCAFFOLD_PROJECT_TYPE";

/// A service that rewrites a simple-tree rendering into a generalized one.
pub trait Generalizer {
    fn generalize(&self, tree: &str, project_type: &str) -> Result<String, GeneralizeError>;
}

/// Runs an external program, writing the request to its stdin and reading
/// the generalized tree from its stdout.
#[derive(Debug, Clone)]
pub struct CommandGeneralizer {
    program: String,
    args: Vec<String>,
}

impl CommandGeneralizer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Split a command line on whitespace. No shell quoting is applied.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }
}

impl Generalizer for CommandGeneralizer {
    fn generalize(&self, tree: &str, project_type: &str) -> Result<String, GeneralizeError> {
        let spawn_err = |source| GeneralizeError::Spawn {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env(PROJECT_TYPE_ENV, project_type)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        // Feed stdin from another thread so a chatty child cannot block us.
        let request = build_prompt(tree, project_type);
        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || {
                let _ = stdin.write_all(request.as_bytes());
            })
        });

        let output = child.wait_with_output().map_err(spawn_err)?;
        if let Some(handle) = writer {
            let _ = handle.join();
        }

        if !output.status.success() {
            return Err(GeneralizeError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| GeneralizeError::InvalidOutput)
    }
}

/// The request sent to a generalizer.
pub fn build_prompt(tree: &str, project_type: &str) -> String {
    format!(
        "Turn the project layout below into a reusable scaffolding template.\n\
         \n\
         - Keep the directory structure but replace project-specific names with generic ones.\n\
         - Collapse runs of similar files into one or two representative examples.\n\
         - Explanatory comments go on their own lines starting with #.\n\
         - Use plain-text tree format: two spaces per level, directories end with /.\n\
         \n\
         Project type: {}\n\
         \n\
         Layout:\n\
         {}\n\
         Reply with the template only, starting at the root folder.\n",
        project_type, tree
    )
}

/// Label a rendered layout by the marker files it contains.
pub fn detect_project_type(tree: &str) -> &'static str {
    let lower = tree.to_lowercase();
    let has = |needle: &str| lower.contains(needle);

    if has("package.json") {
        if has("react") || has("components/") {
            "React/JavaScript application"
        } else if has("vue") {
            "Vue.js application"
        } else if has("angular") {
            "Angular application"
        } else {
            "Node.js/JavaScript project"
        }
    } else if has("go.mod") {
        "Go project"
    } else if has("cargo.toml") {
        "Rust project"
    } else if has("requirements.txt") || has("setup.py") {
        if has("django") || has("manage.py") {
            "Django project"
        } else if has("flask") {
            "Flask project"
        } else {
            "Python project"
        }
    } else if has("pom.xml") {
        "Java/Maven project"
    } else if has("build.gradle") {
        "Java/Gradle project"
    } else if has("gemfile") {
        if has("rails") {
            "Ruby on Rails project"
        } else {
            "Ruby project"
        }
    } else if has(".csproj") {
        "C#/.NET project"
    } else if has("composer.json") {
        if has("laravel") {
            "Laravel project"
        } else {
            "PHP project"
        }
    } else {
        "Unknown project type"
    }
}

/// Strip markdown decoration from a generalizer reply.
///
/// Fence lines, blank lines and leading `- `/`* ` bullets are dropped; the
/// tree text inside fences is kept.
pub fn clean_response(response: &str) -> String {
    let lines: Vec<&str> = response
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.strip_prefix("- ")
                .or_else(|| line.strip_prefix("* "))
                .unwrap_or(line)
        })
        .collect();
    lines.join("\n").trim().to_string()
}

/// Generalize `raw`, falling back to `raw` itself on any failure.
///
/// The result always ends with a newline.
pub fn generalize_or_raw(generalizer: &dyn Generalizer, raw: &str) -> String {
    let project_type = detect_project_type(raw);
    info!("detected project type: {}", project_type);

    let cleaned = match generalizer.generalize(raw, project_type) {
        Ok(reply) => clean_response(&reply),
        Err(e) => {
            warn!("generalization failed, using raw structure: {}", e);
            return raw.to_string();
        }
    };

    if cleaned.is_empty() {
        warn!("generalization failed, using raw structure: {}", GeneralizeError::Empty);
        return raw.to_string();
    }
    format!("{}\n", cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(Result<&'static str, ()>);

    impl Generalizer for Canned {
        fn generalize(&self, _tree: &str, _project_type: &str) -> Result<String, GeneralizeError> {
            self.0
                .map(str::to_string)
                .map_err(|_| GeneralizeError::Failed {
                    status: "exit status: 1".to_string(),
                    stderr: "boom".to_string(),
                })
        }
    }

    #[test]
    fn test_detect_project_type() {
        assert_eq!(detect_project_type("app/\n  Cargo.toml\n"), "Rust project");
        assert_eq!(detect_project_type("web/\n  package.json\n  components/\n"), "React/JavaScript application");
        assert_eq!(detect_project_type("web/\n  package.json\n"), "Node.js/JavaScript project");
        assert_eq!(detect_project_type("site/\n  manage.py\n  requirements.txt\n"), "Django project");
        assert_eq!(detect_project_type("svc/\n  go.mod\n"), "Go project");
        assert_eq!(detect_project_type("x/\n  Gemfile\n"), "Ruby project");
        assert_eq!(detect_project_type("x/\n  App.csproj\n"), "C#/.NET project");
        assert_eq!(detect_project_type("notes/\n  todo.txt\n"), "Unknown project type");
    }

    #[test]
    fn test_clean_response() {
        let reply = "```text\napp/\n  - src/\n\n* README.md\n```\n";
        assert_eq!(clean_response(reply), "app/\n  - src/\nREADME.md");
        assert_eq!(clean_response("- app/\n  lib/\n"), "app/\n  lib/");
        assert_eq!(clean_response("```\n```"), "");
    }

    #[test]
    fn test_generalize_or_raw_uses_cleaned_reply() {
        let out = generalize_or_raw(&Canned(Ok("```\nproject/\n  src/\n```")), "app/\n");
        assert_eq!(out, "project/\n  src/\n");
    }

    #[test]
    fn test_generalize_or_raw_falls_back() {
        let raw = "app/\n  main.rs\n";
        assert_eq!(generalize_or_raw(&Canned(Err(())), raw), raw);
        assert_eq!(generalize_or_raw(&Canned(Ok("\n```\n```\n")), raw), raw);
    }

    #[test]
    fn test_prompt_mentions_inputs() {
        let prompt = build_prompt("app/\n", "Go project");
        assert!(prompt.contains("Project type: Go project"));
        assert!(prompt.contains("app/\n"));
    }

    #[test]
    fn test_from_command_line() {
        assert!(CommandGeneralizer::from_command_line("   ").is_none());
        let cmd = CommandGeneralizer::from_command_line("llm -m local").unwrap();
        assert_eq!(cmd.program, "llm");
        assert_eq!(cmd.args, vec!["-m", "local"]);
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let cmd = CommandGeneralizer::new("scaffold-no-such-generalizer", Vec::new());
        let err = cmd.generalize("app/\n", "Unknown project type").unwrap_err();
        assert!(matches!(err, GeneralizeError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_receives_prompt_and_env() {
        let cmd = CommandGeneralizer::new(
            "sh",
            vec!["-c".to_string(), "cat >/dev/null; echo \"$SCAFFOLD_PROJECT_TYPE\"".to_string()],
        );
        let out = cmd.generalize("app/\n  go.mod\n", "Go project").unwrap();
        assert_eq!(out.trim(), "Go project");
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command() {
        let cmd = CommandGeneralizer::new(
            "sh",
            vec!["-c".to_string(), "cat >/dev/null; echo nope >&2; exit 3".to_string()],
        );
        match cmd.generalize("app/\n", "Unknown project type") {
            Err(GeneralizeError::Failed { stderr, .. }) => assert_eq!(stderr, "nope"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
