//! Dump and load workflow tests against an in-memory adapter

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use strata_migrations::workflow::{self, DumpOutcome, LoadOutcome, Prompt, Target, WorkflowError};
use strata_migrations::{AdapterError, Environment, SchemaAdapter};
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

#[derive(Default)]
struct FakeAdapter {
    dump: Option<String>,
    fail: bool,
    loaded: Vec<PathBuf>,
}

impl SchemaAdapter for &mut FakeAdapter {
    fn name(&self) -> &str {
        "fake"
    }

    fn schema_dump(&mut self) -> Result<Option<String>, AdapterError> {
        if self.fail {
            return Err(AdapterError::Query("boom".into()));
        }
        Ok(self.dump.clone())
    }

    fn schema_load(&mut self, path: &Path) -> Result<(), AdapterError> {
        if self.fail {
            return Err(AdapterError::Query("boom".into()));
        }
        self.loaded.push(path.to_path_buf());
        Ok(())
    }
}

/// Answers questions from a queue, falling back to the default
#[derive(Default)]
struct ScriptedPrompt {
    answers: VecDeque<bool>,
    asked: Vec<(String, bool)>,
}

impl ScriptedPrompt {
    fn answering(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool, WorkflowError> {
        self.asked.push((message.to_string(), default));
        Ok(self.answers.pop_front().unwrap_or(default))
    }
}

fn target(dir: &TempDir) -> Target {
    Target {
        environment: "development".into(),
        defaulted: false,
        env: Environment {
            adapter: "fake".into(),
            name: "app_dev".into(),
            schema_name: None,
        },
        schema_file: dir.path().join("migrations/schema/schema.strata"),
    }
}

fn opener<'a>(
    adapter: &'a mut FakeAdapter,
) -> impl FnOnce(&Environment) -> Result<&'a mut FakeAdapter, AdapterError> + 'a {
    move |_| Ok(adapter)
}

fn never_opened(_: &Environment) -> Result<&'static mut FakeAdapter, AdapterError> {
    panic!("adapter must not be opened")
}

// =============================================================================
// schema:dump
// =============================================================================

mod dump {
    use super::*;

    #[test]
    fn creates_directory_and_writes_script() {
        let dir = TempDir::new().unwrap();
        let target = target(&dir);
        let mut adapter = FakeAdapter {
            dump: Some("table('t', array())->create();\n".into()),
            ..FakeAdapter::default()
        };
        let mut prompt = ScriptedPrompt::default();

        let outcome = workflow::dump::run(&target, opener(&mut adapter), &mut prompt).unwrap();

        let DumpOutcome::Written { path, .. } = outcome else {
            panic!("expected a written dump, got {outcome:?}");
        };
        assert_eq!(path, target.schema_file);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "table('t', array())->create();\n"
        );
        assert_eq!(
            prompt.asked,
            [(workflow::dump::CREATE_DIRECTORY_QUESTION.to_string(), true)]
        );
    }

    #[test]
    fn overwrites_existing_script_without_asking() {
        let dir = TempDir::new().unwrap();
        let target = target(&dir);
        std::fs::create_dir_all(target.schema_dir()).unwrap();
        std::fs::write(&target.schema_file, "old").unwrap();

        let mut adapter = FakeAdapter {
            dump: Some("new".into()),
            ..FakeAdapter::default()
        };
        let mut prompt = ScriptedPrompt::default();

        workflow::dump::run(&target, opener(&mut adapter), &mut prompt).unwrap();

        assert!(prompt.asked.is_empty());
        assert_eq!(std::fs::read_to_string(&target.schema_file).unwrap(), "new");
    }

    #[test]
    fn declining_directory_creation_fails() {
        let dir = TempDir::new().unwrap();
        let target = target(&dir);
        let mut prompt = ScriptedPrompt::answering([false]);

        let err = workflow::dump::run(&target, never_opened, &mut prompt).unwrap_err();

        assert!(matches!(err, WorkflowError::MissingDirectory(ref p) if p == target.schema_dir()));
        assert!(!target.schema_dir().exists());
    }

    #[test]
    fn empty_database_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let target = target(&dir);
        let mut adapter = FakeAdapter::default();

        let outcome =
            workflow::dump::run(&target, opener(&mut adapter), &mut ScriptedPrompt::default())
                .unwrap();

        assert_eq!(outcome, DumpOutcome::Empty);
        assert!(!target.schema_file.exists());
    }

    #[test]
    fn unwritable_file_is_a_write_error() {
        let dir = TempDir::new().unwrap();
        let target = target(&dir);
        // a directory where the file should go
        std::fs::create_dir_all(&target.schema_file).unwrap();

        let mut adapter = FakeAdapter {
            dump: Some("x".into()),
            ..FakeAdapter::default()
        };
        let err =
            workflow::dump::run(&target, opener(&mut adapter), &mut ScriptedPrompt::default())
                .unwrap_err();

        assert!(matches!(err, WorkflowError::Write(ref p, _) if *p == target.schema_file));
        assert!(err.to_string().contains("could not be written to"));
    }

    #[test]
    fn adapter_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let target = target(&dir);
        let mut adapter = FakeAdapter {
            fail: true,
            ..FakeAdapter::default()
        };

        let err =
            workflow::dump::run(&target, opener(&mut adapter), &mut ScriptedPrompt::default())
                .unwrap_err();
        assert!(matches!(err, WorkflowError::Dump(AdapterError::Query(_))));
    }
}

// =============================================================================
// schema:load
// =============================================================================

mod load {
    use super::*;

    fn with_schema_file(dir: &TempDir) -> Target {
        let target = target(dir);
        std::fs::create_dir_all(target.schema_dir()).unwrap();
        std::fs::write(&target.schema_file, "table('t', array())->create();\n").unwrap();
        target
    }

    #[test]
    fn missing_file_never_opens_the_adapter() {
        let dir = TempDir::new().unwrap();
        let target = target(&dir);
        let mut prompt = ScriptedPrompt::default();

        let outcome = workflow::load::run(&target, false, never_opened, &mut prompt).unwrap();

        assert_eq!(
            outcome,
            LoadOutcome::Missing {
                path: target.schema_file.clone()
            }
        );
        assert!(prompt.asked.is_empty());
    }

    #[test]
    fn declined_confirmation_aborts() {
        let dir = TempDir::new().unwrap();
        let target = with_schema_file(&dir);
        let mut prompt = ScriptedPrompt::default();

        let outcome = workflow::load::run(&target, false, never_opened, &mut prompt).unwrap();

        assert_eq!(outcome, LoadOutcome::Aborted);
        assert_eq!(
            prompt.asked,
            [(
                "Hey! You must be pretty damn sure that you want to destroy 'app_dev'. Are you sure?"
                    .to_string(),
                false
            )]
        );
    }

    #[test]
    fn confirmed_load_runs() {
        let dir = TempDir::new().unwrap();
        let target = with_schema_file(&dir);
        let mut adapter = FakeAdapter::default();
        let mut prompt = ScriptedPrompt::answering([true]);

        let outcome =
            workflow::load::run(&target, false, opener(&mut adapter), &mut prompt).unwrap();

        assert!(matches!(outcome, LoadOutcome::Loaded { .. }));
        assert_eq!(adapter.loaded, [target.schema_file.clone()]);
    }

    #[test]
    fn destroy_flag_skips_the_prompt() {
        let dir = TempDir::new().unwrap();
        let target = with_schema_file(&dir);
        let mut adapter = FakeAdapter::default();
        let mut prompt = ScriptedPrompt::default();

        workflow::load::run(&target, true, opener(&mut adapter), &mut prompt).unwrap();

        assert!(prompt.asked.is_empty());
        assert_eq!(adapter.loaded.len(), 1);
    }

    #[test]
    fn adapter_failure_is_an_execution_error() {
        let dir = TempDir::new().unwrap();
        let target = with_schema_file(&dir);
        let mut adapter = FakeAdapter {
            fail: true,
            ..FakeAdapter::default()
        };

        let err = workflow::load::run(&target, true, opener(&mut adapter), &mut ScriptedPrompt::default())
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Execution(_)));
    }
}
