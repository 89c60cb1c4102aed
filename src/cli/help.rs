//! Help listing of configured environments and commands

use crate::config::Config;
use colored::Colorize;

/// Width command names are padded to in the listing
pub const NAME_WIDTH: usize = 20;

/// Pad `text` with trailing spaces up to `width` characters
pub fn pad_name(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}

/// Render the listing shown when no command is given
pub fn render_usage(config: &Config) -> String {
    let environments: Vec<String> = config
        .sorted_environments()
        .into_iter()
        .map(|env| format!("  - {}", env))
        .collect();

    let commands: Vec<String> = config
        .sorted_commands()
        .into_iter()
        .map(|(name, cmd)| {
            format!("  > {} {}", pad_name(name, NAME_WIDTH), cmd.help_text)
                .trim_end()
                .to_string()
        })
        .collect();

    [
        "Available Environments".cyan().to_string(),
        environments.join("\n"),
        String::new(),
        "Available Commands".cyan().to_string(),
        commands.join("\n"),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn test_pad_name() {
        assert_eq!(pad_name("command 1", 20), "command 1           ");
        assert_eq!(pad_name("bla-bla-bla-bla-bla", 20), "bla-bla-bla-bla-bla ");
        assert_eq!(
            pad_name("what if I write a too long command?", 20),
            "what if I write a too long command?"
        );
    }

    #[test]
    fn test_render_usage_sorted() {
        let config = parse_config(
            r#"
environments: [TEST, DEV]
commands:
  start:
    help_text: Start things
  build:
    help_text: Build things
  shell:
    run: RUN bash
"#,
        )
        .unwrap();

        let usage = render_usage(&config);
        let lines: Vec<&str> = usage.lines().collect();

        assert!(lines[0].contains("Available Environments"));
        assert_eq!(lines[1], "  - DEV");
        assert_eq!(lines[2], "  - TEST");
        assert_eq!(lines[3], "");
        assert!(lines[4].contains("Available Commands"));
        assert_eq!(lines[5], "  > build                Build things");
        assert_eq!(lines[6], "  > shell");
        assert_eq!(lines[7], "  > start                Start things");
    }
}
