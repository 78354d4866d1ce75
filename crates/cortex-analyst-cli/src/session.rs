use anyhow::{anyhow, Result};
use console::style;

use crate::prompt::{InputType, Prompt};
use cortex_analyst::errors::AnalystResult;
use cortex_analyst::models::role::Role;
use cortex_analyst::orchestrator::{Exchange, Orchestrator};
use cortex_analyst::render::{Element, SuggestionKey};
use cortex_analyst::semantic_model::SemanticModelCatalog;
use cortex_analyst::state::ConversationState;

pub struct Session<'a> {
    orchestrator: Orchestrator,
    prompt: Box<dyn Prompt + 'a>,
    catalog: SemanticModelCatalog,
    model: String,
    state: ConversationState,
}

impl<'a> Session<'a> {
    pub fn new(
        orchestrator: Orchestrator,
        prompt: Box<impl Prompt + 'a>,
        catalog: SemanticModelCatalog,
        model: String,
    ) -> Self {
        Session {
            orchestrator,
            prompt,
            catalog,
            model,
            state: ConversationState::new(),
        }
    }

    pub async fn start(&mut self) -> Result<()> {
        self.prompt.analyst_ready(&self.model);

        loop {
            let input = self.prompt.get_input()?;
            match input.input_type {
                InputType::Message => {
                    if let Some(content) = &input.content {
                        self.ask(content).await;
                    }
                }
                InputType::Pick => {
                    if let Some(key) = &input.content {
                        self.pick(key);
                    }
                }
                InputType::SwitchModel => {
                    if let Some(model) = &input.content {
                        self.switch_model(model);
                    }
                }
                InputType::ListModels => self.list_models(),
                InputType::History => self.history().await,
                InputType::AskAgain => continue,
                InputType::Exit => break,
            }

            // A picked suggestion is asked exactly like a typed question
            while let Some(suggestion) = self.state.active_suggestion().map(String::from) {
                self.prompt.render_user(&suggestion);
                self.prompt.show_busy();
                let result = self
                    .orchestrator
                    .process_active_suggestion(&mut self.state, &self.model)
                    .await;
                self.prompt.hide_busy();
                if let Some(result) = result {
                    self.show(result);
                }
            }
        }

        self.state.clear();
        self.prompt.close();
        Ok(())
    }

    /// Single question, no prompt loop. Fails if the exchange or any of its queries fails.
    pub async fn headless_start(&mut self, question: &str) -> Result<()> {
        self.prompt.show_busy();
        let result = self
            .orchestrator
            .process(&mut self.state, question, &self.model)
            .await;
        self.prompt.hide_busy();

        let exchange = result?;
        self.prompt.render(&exchange.view);
        if let Some(failure) = exchange.failures.first() {
            return Err(anyhow!(failure.clone()));
        }
        Ok(())
    }

    async fn ask(&mut self, question: &str) {
        self.prompt.show_busy();
        let result = self
            .orchestrator
            .process(&mut self.state, question, &self.model)
            .await;
        self.prompt.hide_busy();
        self.show(result);
    }

    fn show(&mut self, result: AnalystResult<Exchange>) {
        match result {
            Ok(exchange) => {
                for warning in &exchange.warnings {
                    self.prompt.render_notice(&format!("warning: {}", warning));
                }
                self.prompt.render(&exchange.view);
            }
            Err(e) => self.prompt.render_error(&e.to_string()),
        }
    }

    fn pick(&mut self, key: &str) {
        let clicked = key
            .parse::<SuggestionKey>()
            .and_then(|key| self.state.click(key).map(String::from));
        if let Err(e) = clicked {
            self.prompt.render_error(&e.to_string());
        }
    }

    fn switch_model(&mut self, model: &str) {
        if self.catalog.contains(model) {
            self.model = model.to_string();
            self.prompt
                .render_notice(&format!("Now asking about \"{}\"", self.model));
        } else {
            self.prompt.render_error(&format!(
                "Unknown semantic model \"{}\". Try /models",
                model
            ));
        }
    }

    fn list_models(&mut self) {
        let lines: Vec<String> = self
            .catalog
            .models
            .iter()
            .map(|m| {
                let marker = if m.name == self.model { "*" } else { " " };
                let path = self.catalog.resolve(&m.name).unwrap_or_default();
                format!("{} {} {}", marker, m.name, style(path).dim())
            })
            .collect();
        self.prompt.render_notice(&lines.join("\n"));
    }

    async fn history(&mut self) {
        if self.state.is_empty() {
            self.prompt.render_notice("No messages yet");
            return;
        }
        self.prompt.show_busy();
        let replay = self.orchestrator.replay(&self.state).await;
        self.prompt.hide_busy();

        for message in replay {
            match message.role {
                Role::User => {
                    if let Some(text) = message.view.first().and_then(markdown_text) {
                        self.prompt.render_user(text);
                    }
                }
                Role::Assistant => self.prompt.render(&message.view),
            }
        }
    }
}

fn markdown_text(element: &Element) -> Option<&str> {
    match element {
        Element::Markdown { text } => Some(text),
        _ => None,
    }
}
