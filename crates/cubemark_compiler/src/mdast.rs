//! Prebuilt handler tables mapping third-party grammar tokens onto mdast
//! node types.

use cubemark_ast::Node;

use crate::context::CompileContext;
use crate::error::CompileResult;
use crate::grammar::exit_node;
use crate::handler::HandlerTable;
use crate::token::Token;

/// Token type produced by the strikethrough grammar.
pub const STRIKETHROUGH: &str = "strikethrough";

/// Handlers turning `strikethrough` tokens into `delete` nodes rendered as
/// `<del>`.
pub fn strikethrough() -> HandlerTable {
    HandlerTable::new().with(STRIKETHROUGH, enter_strikethrough, exit_node)
}

fn enter_strikethrough(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    ctx.push(Node::new("delete", token.span).with_h_name("del"), token);
    Ok(())
}
