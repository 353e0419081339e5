use documinty::cli::{Commands, Runner, ScriptedPrompt, DESCRIPTION_PROMPT, METHODS_PROMPT};
use documinty::models::Entry;
use documinty::Store;
use speculate2::speculate;

/// Run one command with scripted answers, returning the result and captured stdout.
fn run_cli(store: &Store, answers: &[&str], command: Commands) -> (anyhow::Result<()>, String) {
    let mut runner = Runner::new(store, ScriptedPrompt::new(answers.iter().copied()), Vec::new());
    let result = runner.run(command);
    let output = String::from_utf8(runner.output().clone()).expect("Output is not UTF-8");
    (result, output)
}

fn ok_output(store: &Store, answers: &[&str], command: Commands) -> String {
    let (result, output) = run_cli(store, answers, command);
    result.expect("Command failed");
    output
}

fn err_message(store: &Store, command: Commands) -> String {
    let (result, _) = run_cli(store, &[], command);
    result.expect_err("Command should fail").to_string()
}

fn feat(name: &str) -> Commands {
    Commands::Feat {
        name: name.to_string(),
    }
}

fn doc(path: &str, feature: &str) -> Commands {
    Commands::Doc {
        path: path.to_string(),
        feature: feature.to_string(),
        node: "model".to_string(),
        description: None,
        methods: None,
    }
}

fn show(path: &str, feature: Option<&str>) -> Commands {
    Commands::Show {
        path: path.to_string(),
        feature: feature.map(str::to_string),
        json: false,
    }
}

speculate! {
    before {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = Store::new(dir.path());
    }

    describe "init" {
        it "creates the project and reports the codebase name" {
            let out = ok_output(&store, &[], Commands::Init { codebase: Some("myapp".to_string()) });

            assert!(out.starts_with("✅ Initialized documinty for 'myapp'"));
            assert!(store.features_path().is_dir());
        }

        it "refuses other commands before init" {
            let message = err_message(&store, Commands::Features);
            assert!(message.contains("dmt init"));
        }
    }

    describe "initialized project" {
        before {
            ok_output(&store, &[], Commands::Init { codebase: Some("myapp".to_string()) });
        }

        describe "feat" {
            it "creates a feature" {
                let out = ok_output(&store, &[], feat("f1"));
                assert_eq!(out, "✅ Created feature 'f1'\n");
                assert!(store.features_path().join("f1.yml").exists());
            }

            it "warns without failing when the feature exists" {
                ok_output(&store, &[], feat("f1"));
                let out = ok_output(&store, &[], feat("f1"));
                assert_eq!(out, "⚠️ Feature 'f1' already exists\n");
            }
        }

        describe "features" {
            it "reports when none are defined" {
                let out = ok_output(&store, &[], Commands::Features);
                assert_eq!(out, "No features defined.\n");
            }

            it "lists defined features" {
                ok_output(&store, &[], feat("a"));
                ok_output(&store, &[], feat("b"));
                let out = ok_output(&store, &[], Commands::Features);

                assert!(out.contains("Defined features for 'myapp':"));
                assert!(out.contains("• a\n"));
                assert!(out.contains("• b\n"));
            }
        }

        describe "search" {
            it "lists matching features" {
                ok_output(&store, &[], feat("auth"));
                ok_output(&store, &[], feat("billing"));
                let out = ok_output(&store, &[], Commands::Search { query: "ut".to_string() });
                assert_eq!(out, "Matching features:\n• auth\n");
            }

            it "reports when nothing matches" {
                let out = ok_output(&store, &[], Commands::Search { query: "zzz".to_string() });
                assert_eq!(out, "❌ No features match 'zzz'\n");
            }
        }

        describe "doc and show" {
            before {
                ok_output(&store, &[], feat("feat1"));
            }

            it "prompts for description and methods" {
                let mut runner = Runner::new(&store, ScriptedPrompt::new(["My desc", "m1, m2"]), Vec::new());
                runner.run(doc("app/models/user.rb", "feat1")).expect("Failed to doc");

                assert_eq!(runner.prompt().asked(), &[DESCRIPTION_PROMPT.to_string(), METHODS_PROMPT.to_string()]);
                let out = String::from_utf8(runner.output().clone()).unwrap();
                assert_eq!(out, "✅ Documented app/models/user.rb as model under 'feat1'\n");

                let entries = store.entries_for("app/models/user.rb").unwrap();
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].description, "My desc");
                assert_eq!(entries[0].methods, vec!["m1", "m2"]);
                assert!(!entries[0].timestamp.is_empty());
            }

            it "skips prompts when values are given" {
                let (result, _) = run_cli(&store, &[], Commands::Doc {
                    path: "user.rb".to_string(),
                    feature: "feat1".to_string(),
                    node: "model".to_string(),
                    description: Some("Given".to_string()),
                    methods: Some("".to_string()),
                });
                result.expect("Failed to doc");
                assert!(store.entries_for("user.rb").unwrap()[0].methods.is_empty());
            }

            it "fails for a missing feature" {
                let (result, _) = run_cli(&store, &["desc", ""], doc("user.rb", "nope"));
                assert_eq!(result.unwrap_err().to_string(), "Feature 'nope' does not exist");
            }

            it "shows the documentation for a file" {
                ok_output(&store, &["My desc", "m1,m2"], doc("user.rb", "feat1"));
                let out = ok_output(&store, &[], show("user.rb", None));

                assert!(out.contains("File📄: user.rb\n"));
                assert!(out.contains("Node type⚙️: model\n"));
                assert!(out.contains("Features🏷️: feat1\n"));
                assert!(out.contains("Description📝: My desc\n"));
                assert!(out.contains("Methods🛠️: m1, m2\n"));
                assert!(out.ends_with(&format!("{}\n", "-".repeat(40))));
            }

            it "shows documentation as JSON" {
                ok_output(&store, &["My desc", ""], doc("user.rb", "feat1"));
                let out = ok_output(&store, &[], Commands::Show {
                    path: "user.rb".to_string(),
                    feature: None,
                    json: true,
                });

                let entries: Vec<Entry> = serde_json::from_str(&out).expect("Invalid JSON");
                assert_eq!(entries[0].description, "My desc");
            }

            it "fails to show an undocumented file" {
                assert_eq!(err_message(&store, show("other.rb", None)), "No documentation found for 'other.rb'");
                assert_eq!(
                    err_message(&store, show("other.rb", Some("feat1"))),
                    "No documentation found for 'other.rb' under feature 'feat1'"
                );
            }

            it "filters shown documentation by feature" {
                ok_output(&store, &[], feat("feat2"));
                ok_output(&store, &["one", ""], doc("user.rb", "feat1"));
                ok_output(&store, &["two", ""], doc("user.rb", "feat2"));

                let out = ok_output(&store, &[], show("user.rb", Some("feat2")));
                assert!(out.contains("Description📝: two"));
                assert!(!out.contains("Description📝: one"));
            }
        }

        describe "feature views" {
            before {
                ok_output(&store, &[], feat("auth"));
            }

            it "reports an empty feature" {
                let out = ok_output(&store, &[], Commands::ShowFeature { feature: "auth".to_string(), json: false });
                assert_eq!(out, "No entries under 'auth'.\n");
            }

            it "lists the files under a feature" {
                ok_output(&store, &["Handles login", ""], doc("app/login.rb", "auth"));
                let out = ok_output(&store, &[], Commands::ShowFeature { feature: "auth".to_string(), json: false });
                assert_eq!(out, "Entries for 'auth':\n📄app/login.rb | (model) – Handles login\n");
            }

            it "groups files by directory" {
                ok_output(&store, &["", ""], doc("app/a.rb", "auth"));
                ok_output(&store, &["", ""], doc("lib/b.rb", "auth"));
                ok_output(&store, &["", ""], doc("app/c.rb", "auth"));

                let out = ok_output(&store, &[], Commands::Involved { feature: "auth".to_string() });
                assert_eq!(out, "🔖 auth\n📁 app\n    📄 a.rb\n    📄 c.rb\n📁 lib\n    📄 b.rb\n");
            }

            it "fails for a missing feature" {
                let message = err_message(&store, Commands::Involved { feature: "nope".to_string() });
                assert_eq!(message, "Feature 'nope' does not exist");
            }
        }

        describe "untag" {
            before {
                ok_output(&store, &[], feat("auth"));
                ok_output(&store, &["", ""], doc("login.rb", "auth"));
            }

            it "removes the tag" {
                let out = ok_output(&store, &[], Commands::Untag { path: "login.rb".to_string(), feature: "auth".to_string() });
                assert_eq!(out, "🗑️  Removed login.rb (model) from 'auth'\n");
                assert!(store.entries_for("login.rb").unwrap().is_empty());
            }

            it "fails when the file is not tagged" {
                let message = err_message(&store, Commands::Untag { path: "other.rb".to_string(), feature: "auth".to_string() });
                assert_eq!(message, "No entries for 'other.rb' under feature 'auth'");
            }
        }

        describe "methods" {
            before {
                ok_output(&store, &[], feat("auth"));
                ok_output(&store, &["", "a"], doc("login.rb", "auth"));
            }

            it "adds methods from the prompt" {
                let out = ok_output(&store, &["b, a"], Commands::Methods {
                    path: "login.rb".to_string(),
                    feature: "auth".to_string(),
                    action: "add".to_string(),
                    methods: None,
                });
                assert_eq!(out, "✅ Updated methods for login.rb under 'auth': a, b\n");
            }

            it "removes methods given on the command line" {
                let out = ok_output(&store, &[], Commands::Methods {
                    path: "login.rb".to_string(),
                    feature: "auth".to_string(),
                    action: "remove".to_string(),
                    methods: Some("a".to_string()),
                });
                assert_eq!(out, "✅ Updated methods for login.rb under 'auth': \n");
            }

            it "rejects unknown actions before prompting" {
                let mut runner = Runner::new(&store, ScriptedPrompt::default(), Vec::new());
                let err = runner.run(Commands::Methods {
                    path: "login.rb".to_string(),
                    feature: "auth".to_string(),
                    action: "rename".to_string(),
                    methods: None,
                }).unwrap_err();

                assert_eq!(err.to_string(), "Action not supported must be 'add' OR 'remove'");
                assert!(runner.prompt().asked().is_empty());
            }
        }

        describe "descriptions" {
            before {
                ok_output(&store, &[], feat("auth"));
                ok_output(&store, &[], feat("audit"));
                ok_output(&store, &["Handles login", ""], doc("login.rb", "auth"));
                ok_output(&store, &["", ""], doc("login.rb", "audit"));
            }

            it "describes a file across features" {
                let out = ok_output(&store, &[], Commands::Describe { path: "login.rb".to_string(), feature: None });
                assert_eq!(
                    out,
                    "ℹ️  No description provided for 'login.rb' under 'audit'\n\
                     📋 login.rb : (FEATURE: auth)\n--→ Handles login\n"
                );
            }

            it "describes a file under one feature" {
                let out = ok_output(&store, &[], Commands::Describe {
                    path: "login.rb".to_string(),
                    feature: Some("auth".to_string()),
                });
                assert_eq!(out, "📋 login.rb\n--→ Handles login\n");
            }

            it "fails for an undocumented file" {
                let message = err_message(&store, Commands::Describe { path: "x.rb".to_string(), feature: None });
                assert_eq!(message, "No description found for 'x.rb'");
            }

            it "updates the description" {
                let out = ok_output(&store, &["New text"], Commands::UpdateDescription {
                    path: "login.rb".to_string(),
                    feature: "auth".to_string(),
                    description: None,
                });
                assert_eq!(out, "✅ Description updated for login.rb under 'auth':\n   New text\n");

                let entries = Store::new(dir.path()).entries_for_feature("auth").unwrap();
                assert_eq!(entries[0].description, "New text");
            }

            it "fails to update a missing entry" {
                let (result, _) = run_cli(&store, &["x"], Commands::UpdateDescription {
                    path: "other.rb".to_string(),
                    feature: "auth".to_string(),
                    description: None,
                });
                assert_eq!(
                    result.unwrap_err().to_string(),
                    "No documentation found for 'other.rb' under feature 'auth'"
                );
            }
        }
    }
}
