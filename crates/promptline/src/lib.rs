pub use promptline_config::{Alignment, Block, PromptConfig, Segment};
pub use promptline_context::{Context, mock};
pub use promptline_eval::{
    PromptRenderer, RenderError, RenderedBlock, RenderedPrompt, Resolved, Resolver, Scope,
};
pub use promptline_syntax::{TemplateCache, parse_template};

/// Resolves a single template string against a snapshot with root scope.
pub fn resolve(template: &str, snapshot: &Context) -> Resolved {
    Resolver::new().resolve(template, &Scope::root(snapshot))
}

/// Renders a full prompt configuration against a snapshot.
pub fn render(config: &PromptConfig, snapshot: &Context) -> RenderedPrompt {
    PromptRenderer::new().render(config, snapshot)
}

pub mod prelude {
    pub use crate::{render, resolve};
    pub use crate::{Context, PromptConfig, PromptRenderer, RenderedPrompt, Resolver, Scope};
}
