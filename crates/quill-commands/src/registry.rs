//! Read-only view of the registered commands, filtered per caller.

use quill_common::UserId;

/// Who may see and run a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Everyone.
    Public,
    /// Only the configured owner.
    OwnerOnly,
}

/// Name and description of one registered command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    /// Command name as typed after the slash.
    pub name: String,
    /// One-line description, if the command has one.
    pub description: Option<String>,
    /// Who may see it.
    pub visibility: Visibility,
}

impl CommandDescriptor {
    /// A public command.
    pub fn public(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            visibility: Visibility::Public,
        }
    }

    /// An owner-only command.
    pub fn owner_only(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            visibility: Visibility::OwnerOnly,
            ..Self::public(name, description)
        }
    }
}

/// Snapshot of the command table taken at startup.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandDescriptor>,
    owner: Option<UserId>,
}

impl CommandRegistry {
    /// Creates a registry over `commands`; `owner` may see owner-only entries.
    pub fn new(commands: Vec<CommandDescriptor>, owner: UserId) -> Self {
        Self {
            commands,
            owner: Some(owner),
        }
    }

    /// Snapshots poise's command table. `owners_only` commands become
    /// [`Visibility::OwnerOnly`]; `hide_in_help` commands are left out.
    pub fn from_commands<U, E>(commands: &[poise::Command<U, E>], owner: UserId) -> Self {
        let commands = commands
            .iter()
            .filter(|command| !command.hide_in_help)
            .map(|command| CommandDescriptor {
                name: command.name.clone(),
                description: command.description.clone(),
                visibility: if command.owners_only {
                    Visibility::OwnerOnly
                } else {
                    Visibility::Public
                },
            })
            .collect();
        Self::new(commands, owner)
    }

    /// Commands `caller` may see, sorted by name.
    pub fn list_visible(&self, caller: UserId) -> Vec<&CommandDescriptor> {
        let is_owner = self.owner == Some(caller);
        let mut visible: Vec<_> = self
            .commands
            .iter()
            .filter(|command| is_owner || command.visibility == Visibility::Public)
            .collect();
        visible.sort_by(|a, b| a.name.cmp(&b.name));
        visible
    }

    /// Looks a command up by name.
    pub fn get(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.iter().find(|command| command.name == name)
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use quill_common::test_utils::discord_fixtures::{member_id, owner_id};
    use quill_common::test_utils::property_testing::command_name_strategy;

    fn registry() -> CommandRegistry {
        CommandRegistry::new(
            vec![
                CommandDescriptor::public("ping", "Latency"),
                CommandDescriptor::owner_only("shutdown", "Stop the bot"),
                CommandDescriptor::public("ask_gpt", "Ask a question"),
                CommandDescriptor::owner_only("sync", "Re-register commands"),
            ],
            owner_id(),
        )
    }

    #[test]
    fn test_non_owner_sees_public_sorted() {
        let registry = registry();
        let names: Vec<&str> = registry
            .list_visible(member_id())
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["ask_gpt", "ping"]);
    }

    #[test]
    fn test_owner_sees_everything_sorted() {
        let registry = registry();
        let names: Vec<&str> = registry
            .list_visible(owner_id())
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["ask_gpt", "ping", "shutdown", "sync"]);
    }

    #[test]
    fn test_default_registry_is_empty_and_ownerless() {
        let registry = CommandRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.list_visible(owner_id()).is_empty());
    }

    #[test]
    fn test_from_framework_commands() {
        let registry = CommandRegistry::from_commands(&crate::framework::commands(), owner_id());

        assert_eq!(registry.get("sync").unwrap().visibility, Visibility::OwnerOnly);
        assert_eq!(
            registry.get("shutdown").unwrap().visibility,
            Visibility::OwnerOnly
        );
        assert_eq!(registry.get("help").unwrap().visibility, Visibility::Public);
        assert!(registry
            .get("ask_gpt")
            .and_then(|c| c.description.as_deref())
            .is_some());
    }

    proptest! {
        #[test]
        fn prop_members_never_see_owner_commands(
            table in proptest::collection::vec((command_name_strategy(), any::<bool>()), 0..30),
        ) {
            let commands = table
                .into_iter()
                .map(|(name, owner_only)| {
                    if owner_only {
                        CommandDescriptor::owner_only(name, "owner")
                    } else {
                        CommandDescriptor::public(name, "public")
                    }
                })
                .collect();
            let registry = CommandRegistry::new(commands, owner_id());

            let visible = registry.list_visible(member_id());
            prop_assert!(visible.iter().all(|c| c.visibility == Visibility::Public));
            prop_assert!(visible.windows(2).all(|w| w[0].name <= w[1].name));
            prop_assert!(registry.list_visible(owner_id()).len() >= visible.len());
        }
    }
}
