use anyhow::Result;
use cortex_analyst::render::Element;

pub mod rustyline;
pub mod view;

pub trait Prompt {
    fn render(&mut self, view: &[Element]);
    /// Echo a prompt that did not come from the keyboard, e.g. a picked suggestion
    fn render_user(&mut self, text: &str);
    fn render_notice(&mut self, text: &str);
    fn render_error(&mut self, message: &str);
    fn get_input(&mut self) -> Result<Input>;
    fn show_busy(&mut self);
    fn hide_busy(&self);
    fn close(&self);
    fn analyst_ready(&self, model: &str) {
        println!("\n");
        println!(
            "Ask a question about the \"{}\" semantic model. Type /? for commands.",
            model
        );
        println!("\n");
    }
    // Used for testing. Allows us to downcast to any type.
    #[cfg(test)]
    fn as_any(&self) -> &dyn std::any::Any;
}

pub struct Input {
    pub input_type: InputType,
    pub content: Option<String>, // Optional content as sometimes the user may be issuing a command eg. (Exit)
}

impl Input {
    pub fn new(input_type: InputType, content: Option<String>) -> Self {
        Self {
            input_type,
            content,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    AskAgain,    // Ask the user for input again. Control flow command.
    Message,     // User sent a question
    Pick,        // User clicked a suggestion, content is its key
    SwitchModel, // Content is the semantic model name
    ListModels,
    History,
    Exit,
}

pub enum Theme {
    Light,
    Dark,
}

/// Interpret one line of input. Returns None for purely local commands the prompt
/// handles itself (theme, help, ...).
pub fn parse_command(line: &str) -> Option<Input> {
    let line = line.trim();
    let (command, argument) = match line.split_once(char::is_whitespace) {
        Some((command, argument)) => (command, Some(argument.trim().to_string())),
        None => (line, None),
    };

    if !command.starts_with('/') {
        return Some(Input::new(InputType::Message, Some(line.to_string())));
    }

    let input_type = match command.to_ascii_lowercase().as_str() {
        "/exit" | "/quit" => InputType::Exit,
        "/pick" | "/p" => InputType::Pick,
        "/model" => InputType::SwitchModel,
        "/models" => InputType::ListModels,
        "/history" => InputType::History,
        _ => return None,
    };

    let needs_argument = matches!(input_type, InputType::Pick | InputType::SwitchModel);
    if needs_argument && argument.as_deref().map_or(true, str::is_empty) {
        return Some(Input::new(InputType::AskAgain, None));
    }

    Some(Input::new(input_type, argument))
}
