//! # Subscription Commands
//!
//! `/start`, `/send_task` and `/stop`. None take options.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use serenity::builder::CreateApplicationCommand;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        simple_command("start", "Subscribe to daily practice tasks"),
        simple_command("send_task", "Get a fresh batch of tasks right now"),
        simple_command("stop", "Unsubscribe from daily tasks"),
    ]
}

fn simple_command(name: &str, description: &str) -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command.name(name).description(description).dm_permission(true);
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_subscription_commands() {
        let commands = create_commands();
        let names: Vec<&str> = commands
            .iter()
            .map(|c| c.0.get("name").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["start", "send_task", "stop"]);
    }

    #[test]
    fn test_commands_allowed_in_dms() {
        for command in create_commands() {
            assert_eq!(command.0.get("dm_permission").unwrap().as_bool(), Some(true));
        }
    }
}
