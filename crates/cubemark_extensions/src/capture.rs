//! Handler building blocks shared by the value-capturing extensions.

use cubemark_ast::Node;
use cubemark_compiler::grammar::DATA;
use cubemark_compiler::{CompileContext, CompileResult, EventKind, Token};

/// Opens a node rendered as `node_type` and starts buffering its value.
pub(crate) fn open_buffered(
    ctx: &mut CompileContext<'_>,
    token: &Token,
    node_type: &str,
) -> CompileResult<()> {
    ctx.push(Node::new(node_type, token.span).with_h_name(node_type), token);
    ctx.begin()
}

/// Value tokens reuse the default literal text handlers.
pub(crate) fn enter_value(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    ctx.delegate(EventKind::Enter, DATA, token)
}

pub(crate) fn exit_value(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    ctx.delegate(EventKind::Exit, DATA, token)
}

/// Opens a container node rendered as `node_type`.
pub(crate) fn open_container(ctx: &mut CompileContext<'_>, token: &Token, node_type: &str) {
    ctx.push(Node::new(node_type, token.span).with_h_name(node_type), token);
}

pub(crate) fn close_container(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    ctx.pop(token)
}
