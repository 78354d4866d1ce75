use std::io::{self, Write};

use anyhow::Result;
use bat::WrappingMode;
use cliclack::spinner;
use console::style;
use cortex_analyst::render::Element;

use super::view::{format_bar_chart, format_line_chart, format_table};
use super::{parse_command, Input, InputType, Prompt, Theme};

const PROMPT: &str = "\x1b[1m\x1b[38;5;30m(?)> \x1b[0m";
const INDENT: &str = "  ";

pub struct RustylinePrompt {
    spinner: cliclack::ProgressBar,
    theme: Theme,
    show_collapsed: bool,
}

impl RustylinePrompt {
    pub fn new() -> Self {
        RustylinePrompt {
            spinner: spinner(),
            theme: Theme::Dark,
            show_collapsed: false,
        }
    }

    fn theme_name(&self) -> &'static str {
        match self.theme {
            Theme::Light => "GitHub",
            Theme::Dark => "zenburn",
        }
    }

    fn render_element(&self, element: &Element, depth: usize) {
        let indent = INDENT.repeat(depth);
        let theme = self.theme_name();

        match element {
            Element::Markdown { text } => pretty_print(text, theme, "Markdown"),
            Element::Code { language, source } => pretty_print(source, theme, language),
            Element::Expander {
                title,
                expanded,
                children,
            } => {
                if *expanded || self.show_collapsed {
                    println!("{}{} {}", indent, style("▾").dim(), style(title).bold());
                    for child in children {
                        self.render_element(child, depth + 1);
                    }
                } else {
                    println!(
                        "{}{} {} {}",
                        indent,
                        style("▸").dim(),
                        style(title).bold(),
                        style("(hidden, /x to show)").dim()
                    );
                }
            }
            Element::Suggestion { key, label } => {
                println!(
                    "{}{} {}",
                    indent,
                    style(format!("[{}]", key)).cyan(),
                    label
                );
            }
            Element::Table { result } => print_block(&format_table(result), &indent),
            Element::Tabs { tabs } => {
                for tab in tabs {
                    println!(
                        "{}─── {} ───",
                        indent,
                        style(&tab.label).magenta().dim()
                    );
                    self.render_element(&tab.content, depth);
                }
            }
            Element::LineChart { chart } => print_block(&format_line_chart(chart), &indent),
            Element::BarChart { chart } => print_block(&format_bar_chart(chart), &indent),
            Element::Error { message } => {
                println!("{}{}", indent, style(message).red());
            }
        }
    }
}

impl Default for RustylinePrompt {
    fn default() -> Self {
        Self::new()
    }
}

fn pretty_print(content: &str, theme: &str, language: &str) {
    let printed = bat::PrettyPrinter::new()
        .input(bat::Input::from_bytes(content.as_bytes()))
        .theme(theme)
        .language(language)
        .wrapping_mode(WrappingMode::Character)
        .print();
    if let Err(e) = printed {
        tracing::debug!("pretty printing failed, falling back to plain text: {}", e);
        println!("{}", content);
    }
}

fn print_block(text: &str, indent: &str) {
    for line in text.lines() {
        println!("{}{}", indent, line);
    }
}

impl Prompt for RustylinePrompt {
    fn render(&mut self, view: &[Element]) {
        for element in view {
            self.render_element(element, 0);
        }
        println!();
        io::stdout().flush().expect("Failed to flush stdout");
    }

    fn render_user(&mut self, text: &str) {
        println!("{}{}", PROMPT, text);
    }

    fn render_notice(&mut self, text: &str) {
        println!("{}", style(text).dim());
    }

    fn render_error(&mut self, message: &str) {
        println!("{}", style(message).red().bold());
    }

    fn show_busy(&mut self) {
        self.spinner = spinner();
        self.spinner.start("Generating the answer...");
    }

    fn hide_busy(&self) {
        self.spinner.stop("");
    }

    fn get_input(&mut self) -> Result<Input> {
        let mut editor = rustyline::DefaultEditor::new()?;
        let message_text = match editor.readline(PROMPT) {
            Ok(text) => text,
            Err(e) => {
                match e {
                    rustyline::error::ReadlineError::Interrupted => (),
                    _ => eprintln!("Input error: {}", e),
                }
                return Ok(Input::new(InputType::Exit, None));
            }
        };

        if let Some(input) = parse_command(&message_text) {
            if input.input_type == InputType::Message
                && input.content.as_deref().map_or(true, str::is_empty)
            {
                return Ok(Input::new(InputType::AskAgain, None));
            }
            return Ok(input);
        }

        let command = message_text.trim();
        if command.eq_ignore_ascii_case("/t") {
            self.theme = match self.theme {
                Theme::Light => {
                    println!("Switching to Dark theme");
                    Theme::Dark
                }
                Theme::Dark => {
                    println!("Switching to Light theme");
                    Theme::Light
                }
            };
        } else if command.eq_ignore_ascii_case("/x") {
            self.show_collapsed = !self.show_collapsed;
            println!(
                "Collapsed sections are now {}",
                if self.show_collapsed { "shown" } else { "hidden" }
            );
        } else {
            println!("Commands:");
            println!("/exit - Exit the session");
            println!("/pick <key> - Ask a suggested question, e.g. /pick 1_0");
            println!("/model <name> - Switch the semantic model");
            println!("/models - List the semantic models");
            println!("/history - Show the conversation so far");
            println!("/x - Show or hide collapsed sections such as generated SQL");
            println!("/t - Toggle Light/Dark theme");
            println!("/? | /help - Display this help message");
        }

        Ok(Input::new(InputType::AskAgain, None))
    }

    fn close(&self) {
        // No cleanup required
    }

    #[cfg(test)]
    fn as_any(&self) -> &dyn std::any::Any {
        panic!("Not implemented");
    }
}
