use crate::dom::{Tree, escape};
use crate::error::{EmptyResultError, ViewError};
use crate::reconciler::{self, ReconcileReport};

pub mod markup;

pub const ICONS: &str = "icons.svg";

/// Turns a data snapshot into markup for one kind of view.
pub trait MarkupGenerator {
    type Data: ?Sized;

    fn generate(&self, data: &Self::Data) -> String;

    /// Data that should show the error message instead of markup.
    fn is_empty(&self, _data: &Self::Data) -> bool {
        false
    }

    fn error_message(&self) -> &str;

    fn success_message(&self) -> &str {
        ""
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

/// What a container currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    Empty,
    Spinner,
    Message(MessageKind),
    Content,
}

/// A container plus the generator that fills it.
///
/// `render` rebuilds the container from scratch. `update` patches it in
/// place and is only allowed once content has been rendered.
pub struct View<G> {
    generator: G,
    container: Tree,
    status: ViewStatus,
}

impl<G: MarkupGenerator> View<G> {
    pub fn new(container: &str, generator: G) -> Self {
        View {
            generator,
            container: Tree::new(container),
            status: ViewStatus::Empty,
        }
    }

    pub fn status(&self) -> ViewStatus {
        self.status
    }

    pub fn container(&self) -> &Tree {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut Tree {
        &mut self.container
    }

    /// Markup for `data` without touching the container.
    pub fn markup(&self, data: &G::Data) -> Result<String, EmptyResultError> {
        if self.generator.is_empty(data) {
            return Err(EmptyResultError);
        }
        Ok(self.generator.generate(data))
    }

    /// Full render. Empty data shows the error message instead.
    pub fn render(&mut self, data: &G::Data) {
        match self.markup(data) {
            Ok(markup) => {
                self.replace_content(&markup);
                self.transition(ViewStatus::Content);
            }
            Err(EmptyResultError) => self.render_message(MessageKind::Error, None),
        }
    }

    /// Patch the rendered content to match `data`.
    pub fn update(&mut self, data: &G::Data) -> Result<ReconcileReport, ViewError> {
        if self.status != ViewStatus::Content {
            return Err(ViewError::NotShowingContent);
        }
        let markup = self.generator.generate(data);
        Ok(reconciler::reconcile(&mut self.container, &markup))
    }

    pub fn render_spinner(&mut self) {
        let markup = format!(
            r#"<div class="spinner"><svg><use href="{ICONS}#icon-loader"></use></svg></div>"#
        );
        self.replace_content(&markup);
        self.transition(ViewStatus::Spinner);
    }

    /// Show a message panel, falling back to the view's default text.
    pub fn render_message(&mut self, kind: MessageKind, message: Option<&str>) {
        let (symbol, default) = match kind {
            MessageKind::Success => ("smile", self.generator.success_message()),
            MessageKind::Error => ("alert-triangle", self.generator.error_message()),
        };
        let msg = escape(message.unwrap_or(default));
        let markup = format!(
            r#"<div class="message"><div><svg><use href="{ICONS}#icon-{symbol}"></use></svg></div><p>{msg}</p></div>"#
        );
        self.replace_content(&markup);
        self.transition(ViewStatus::Message(kind));
    }

    fn replace_content(&mut self, markup: &str) {
        self.container.clear();
        self.container.insert_markup(markup);
    }

    fn transition(&mut self, next: ViewStatus) {
        if self.status != next {
            log::debug!("view {:?} -> {:?}", self.status, next);
        }
        self.status = next;
    }
}
