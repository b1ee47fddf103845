/*!
AXCTX - Accessibility Context Serializer

Turns a set of anchor elements in a live accessibility tree into a
token-bounded textual snapshot for a language model, spending the budget on
the most relevant surrounding UI first.

```ignore
use axctx::{ContextBuilder, DetailLevel, OutputFormat};

let output = ContextBuilder::new(2000)
    .detail(DetailLevel::Compact)
    .format(OutputFormat::Tagged)
    .build(&anchors)?;

for attachment in &output.attachments {
    if let Some(text) = &attachment.content {
        println!("{text}");
    }
}

// Resolve an id mentioned by the model back to its element.
let element = output.id_map.get(&node_ref);
```
*/

mod arena;
mod budget;
mod build;
mod render;
mod score;
mod tokens;
mod traverse;

pub mod accessibility;
pub mod tree;

mod types;
pub use types::*;

#[cfg(test)]
mod fake;

pub use accessibility::Role;
pub use build::{AnchorAttachment, ContextBuilder, ContextOutput, StopReason};
pub use tokens::estimate_tokens;
pub use tree::{NodeAttributes, UiNode};
