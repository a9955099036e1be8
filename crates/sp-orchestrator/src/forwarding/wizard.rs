//! Interactive forwarding setup
//!
//! The wizard is a sequence of prompts. Each step either advances or, when
//! the user dismisses the prompt or submits nothing, ends the whole flow
//! without side effects.
//!
//! ```text
//! CollectingType ──► CollectingFirstAddress ──► CollectingSecondAddress ──► Built
//!       │                      └──────────── (SOCKS) ─────────────────────►  ▲
//!       └──► PickingRecent ──────────────────────────────────────────────────┘
//! ```

use sp_core::traits::{InputRequest, Prompter, SettingsStore};
use sp_core::{ConfigError, ForwardingSpec};

use super::{build_spec, validate_address, ForwardingKind, RECENTLY_USED_LABEL};

const TYPE_PLACEHOLDER: &str = "Select forwarding type...";
const RECENT_PLACEHOLDER: &str = "Select forwarding arguments from recently used...";
const REMEMBER_MESSAGE: &str = "Want to save this forwarding in recently used?";
const REMEMBER_BUTTON: &str = "Yes";

/// A completed wizard run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardOutcome {
    pub spec: ForwardingSpec,
    /// Picked from the recency cache rather than built
    pub from_recent: bool,
}

enum Step {
    CollectingType,
    PickingRecent,
    CollectingFirstAddress(ForwardingKind),
    CollectingSecondAddress(ForwardingKind, String),
    Built(WizardOutcome),
}

/// Collects a forwarding spec through the UI shell's prompts
pub struct ForwardingWizard<'a> {
    prompter: &'a dyn Prompter,
    settings: &'a dyn SettingsStore,
}

impl<'a> ForwardingWizard<'a> {
    pub fn new(prompter: &'a dyn Prompter, settings: &'a dyn SettingsStore) -> Self {
        Self { prompter, settings }
    }

    /// Run the prompts; `None` if the user cancelled at any step
    pub async fn run(&self) -> Option<WizardOutcome> {
        let recent = self.settings.settings().recently_used_forwardings;
        let mut step = Step::CollectingType;

        loop {
            step = match step {
                Step::CollectingType => {
                    let mut items: Vec<String> = ForwardingKind::ALL
                        .iter()
                        .map(|k| k.label().to_string())
                        .collect();
                    if !recent.is_empty() {
                        items.push(RECENTLY_USED_LABEL.to_string());
                    }

                    let picked = self.prompter.pick(&items, TYPE_PLACEHOLDER).await?;
                    if picked == RECENTLY_USED_LABEL && !recent.is_empty() {
                        Step::PickingRecent
                    } else {
                        Step::CollectingFirstAddress(ForwardingKind::from_label(&picked)?)
                    }
                }
                Step::PickingRecent => {
                    let items: Vec<String> = recent.iter().map(|s| s.as_str().to_string()).collect();
                    let picked = self.prompter.pick(&items, RECENT_PLACEHOLDER).await?;
                    Step::Built(WizardOutcome {
                        spec: ForwardingSpec::new(picked),
                        from_recent: true,
                    })
                }
                Step::CollectingFirstAddress(kind) => {
                    let first = self
                        .ask_address(kind.first_prompt(), kind.first_domain_required())
                        .await?;
                    if kind.second_prompt().is_some() {
                        Step::CollectingSecondAddress(kind, first)
                    } else {
                        Step::Built(WizardOutcome {
                            spec: build_spec(kind, &first, None),
                            from_recent: false,
                        })
                    }
                }
                Step::CollectingSecondAddress(kind, first) => {
                    let prompt = kind.second_prompt()?;
                    let second = self
                        .ask_address(prompt, kind.second_domain_required())
                        .await?;
                    Step::Built(WizardOutcome {
                        spec: build_spec(kind, &first, Some(&second)),
                        from_recent: false,
                    })
                }
                Step::Built(outcome) => {
                    tracing::debug!("Forwarding built: {}", outcome.spec);
                    return Some(outcome);
                }
            };
        }
    }

    async fn ask_address(&self, prompt: &str, domain_required: bool) -> Option<String> {
        let validate = move |input: &str| {
            validate_address(input, domain_required)
                .err()
                .map(|e| e.to_string())
        };

        let answer = self
            .prompter
            .input(InputRequest {
                prompt,
                ignore_focus_out: true,
                validate: &validate,
            })
            .await?;

        if answer.is_empty() {
            return None;
        }
        if let Err(e) = validate_address(&answer, domain_required) {
            tracing::debug!("Discarding forwarding address '{}': {}", answer, e);
            return None;
        }
        Some(answer)
    }

    /// Offer to add `spec` to the recency cache.
    ///
    /// Returns `true` if it was persisted. Specs already cached are not
    /// offered again.
    pub async fn remember(&self, spec: &ForwardingSpec) -> Result<bool, ConfigError> {
        if self
            .settings
            .settings()
            .recently_used_forwardings
            .contains(spec)
        {
            return Ok(false);
        }

        if !self.prompter.confirm(REMEMBER_MESSAGE, REMEMBER_BUTTON).await {
            return Ok(false);
        }

        // Re-read so answers from concurrent wizards are not lost
        let mut recent = self.settings.settings().recently_used_forwardings;
        if !recent.contains(spec) {
            recent.push(spec.clone());
            self.settings.save_recent_forwardings(&recent)?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use sp_core::config::MemorySettingsStore;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct ScriptedPrompter {
        picks: Mutex<VecDeque<Option<String>>>,
        inputs: Mutex<VecDeque<Option<String>>>,
        confirms: Mutex<VecDeque<bool>>,
        pick_lists: Mutex<Vec<Vec<String>>>,
        validations: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedPrompter {
        fn then_pick(self, answer: Option<&str>) -> Self {
            self.picks.lock().push_back(answer.map(String::from));
            self
        }

        fn then_input(self, answer: Option<&str>) -> Self {
            self.inputs.lock().push_back(answer.map(String::from));
            self
        }

        fn then_confirm(self, answer: bool) -> Self {
            self.confirms.lock().push_back(answer);
            self
        }
    }

    #[async_trait]
    impl Prompter for ScriptedPrompter {
        async fn pick(&self, items: &[String], _placeholder: &str) -> Option<String> {
            self.pick_lists.lock().push(items.to_vec());
            self.picks.lock().pop_front().flatten()
        }

        async fn input(&self, request: InputRequest<'_>) -> Option<String> {
            let answer = self.inputs.lock().pop_front().flatten();
            if let Some(answer) = &answer {
                self.validations.lock().push((request.validate)(answer));
            }
            answer
        }

        async fn confirm(&self, _message: &str, _button: &str) -> bool {
            self.confirms.lock().pop_front().unwrap_or(false)
        }

        async fn show_info(&self, _message: &str) {}

        async fn show_error(&self, _message: &str, _action: &str) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_local_to_remote_flow() {
        let prompter = ScriptedPrompter::default()
            .then_pick(Some("Local to remote"))
            .then_input(Some("localhost:9000"))
            .then_input(Some("localhost:9001"));
        let settings = MemorySettingsStore::default();
        let wizard = ForwardingWizard::new(&prompter, &settings);

        let outcome = wizard.run().await.unwrap();
        assert_eq!(outcome.spec.as_str(), "-L localhost:9000:localhost:9001");
        assert!(!outcome.from_recent);
        assert_eq!(prompter.pick_lists.lock()[0].len(), 3);
    }

    #[tokio::test]
    async fn test_socks_asks_once() {
        let prompter = ScriptedPrompter::default()
            .then_pick(Some("SOCKS"))
            .then_input(Some("localhost:1080"))
            .then_input(Some("unused:1"));
        let settings = MemorySettingsStore::default();
        let wizard = ForwardingWizard::new(&prompter, &settings);

        let outcome = wizard.run().await.unwrap();
        assert_eq!(outcome.spec.as_str(), "-D localhost:1080");
        assert_eq!(prompter.inputs.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_at_each_step() {
        let settings = MemorySettingsStore::default();

        let prompter = ScriptedPrompter::default().then_pick(None);
        assert!(ForwardingWizard::new(&prompter, &settings).run().await.is_none());

        let prompter = ScriptedPrompter::default()
            .then_pick(Some("Remote to local"))
            .then_input(None);
        assert!(ForwardingWizard::new(&prompter, &settings).run().await.is_none());

        let prompter = ScriptedPrompter::default()
            .then_pick(Some("Remote to local"))
            .then_input(Some("9000"))
            .then_input(Some(""));
        assert!(ForwardingWizard::new(&prompter, &settings).run().await.is_none());
    }

    #[tokio::test]
    async fn test_validator_reaches_prompt() {
        let prompter = ScriptedPrompter::default()
            .then_pick(Some("Local to remote"))
            .then_input(Some("9000"))
            .then_input(Some("9001"));
        let settings = MemorySettingsStore::default();

        // Second address requires a host, so the flow stops there
        assert!(ForwardingWizard::new(&prompter, &settings).run().await.is_none());
        let validations = prompter.validations.lock();
        assert_eq!(validations[0], None);
        assert_eq!(
            validations[1].as_deref(),
            Some("Please enter a domain and port in range 0 - 65535 (e. g. localhost:9000)")
        );
    }

    #[tokio::test]
    async fn test_recently_used_only_when_cache_non_empty() {
        let settings = MemorySettingsStore::default();
        settings.update(|s| {
            s.recently_used_forwardings = vec![ForwardingSpec::new("-D localhost:1080")]
        });
        let prompter = ScriptedPrompter::default()
            .then_pick(Some(RECENTLY_USED_LABEL))
            .then_pick(Some("-D localhost:1080"));
        let wizard = ForwardingWizard::new(&prompter, &settings);

        let outcome = wizard.run().await.unwrap();
        assert!(outcome.from_recent);
        assert_eq!(outcome.spec.as_str(), "-D localhost:1080");

        let lists = prompter.pick_lists.lock();
        assert_eq!(lists[0].last().map(String::as_str), Some(RECENTLY_USED_LABEL));
        assert_eq!(lists[1], vec!["-D localhost:1080".to_string()]);
    }

    #[tokio::test]
    async fn test_remember_appends_on_yes() {
        let settings = MemorySettingsStore::default();
        let spec = ForwardingSpec::new("-L 9000:localhost:9000");

        let declined = ScriptedPrompter::default().then_confirm(false);
        assert!(!ForwardingWizard::new(&declined, &settings)
            .remember(&spec)
            .await
            .unwrap());
        assert!(settings.settings().recently_used_forwardings.is_empty());

        let accepted = ScriptedPrompter::default().then_confirm(true);
        assert!(ForwardingWizard::new(&accepted, &settings)
            .remember(&spec)
            .await
            .unwrap());
        assert_eq!(settings.settings().recently_used_forwardings, vec![spec.clone()]);

        // Already cached: not asked again
        let again = ScriptedPrompter::default().then_confirm(true);
        assert!(!ForwardingWizard::new(&again, &settings)
            .remember(&spec)
            .await
            .unwrap());
        assert_eq!(again.confirms.lock().len(), 1);
        assert_eq!(settings.settings().recently_used_forwardings.len(), 1);
    }
}
