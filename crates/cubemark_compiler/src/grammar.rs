//! Default document grammar.
//!
//! Handlers for the host markdown constructs. Node types follow mdast
//! naming so trees stay familiar to renderers built for it. Extension
//! handlers take precedence over these for the same token type.

use cubemark_ast::Node;

use crate::context::CompileContext;
use crate::error::CompileResult;
use crate::handler::{HandlerTable, noop};
use crate::token::Token;

/// Token type of literal text spans.
pub const DATA: &str = "data";

macro_rules! open_node {
    ($name:ident, $node_type:literal) => {
        fn $name(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
            ctx.push(Node::new($node_type, token.span), token);
            Ok(())
        }
    };
}

open_node!(enter_paragraph, "paragraph");
open_node!(enter_emphasis, "emphasis");
open_node!(enter_strong, "strong");
open_node!(enter_heading, "heading");
open_node!(enter_block_quote, "blockquote");
open_node!(enter_list_item, "listItem");
open_node!(enter_hard_break, "break");
open_node!(enter_thematic_break, "thematicBreak");
open_node!(enter_link, "link");
open_node!(enter_image, "image");
open_node!(enter_html, "html");

/// Builds the default handler table.
pub fn default_handlers() -> HandlerTable {
    HandlerTable::new()
        .with(DATA, enter_data, exit_data)
        .with("paragraph", enter_paragraph, exit_node)
        .with("emphasis", enter_emphasis, exit_node)
        .with("strong", enter_strong, exit_node)
        .with("atxHeading", enter_heading, exit_node)
        .with("atxHeadingSequence", noop, exit_atx_heading_sequence)
        .with("setextHeading", enter_heading, exit_node)
        .with("setextHeadingLineSequence", noop, exit_setext_heading_sequence)
        .with("blockQuote", enter_block_quote, exit_node)
        .with("listOrdered", enter_list_ordered, exit_node)
        .with("listUnordered", enter_list_unordered, exit_node)
        .with("listItem", enter_list_item, exit_node)
        .with("codeText", enter_code_text, exit_code_text)
        .with("codeTextData", enter_data, exit_data)
        .with("hardBreak", enter_hard_break, exit_node)
        .with("thematicBreak", enter_thematic_break, exit_node)
        .with("codeFenced", enter_code, exit_code)
        .with("codeIndented", enter_code, exit_code)
        .with("codeFencedFenceInfo", noop, exit_code_info)
        .with("codeFencedFenceMeta", noop, exit_code_meta)
        .with("codeFlowValue", enter_data, exit_data)
        .with("link", enter_link, exit_node)
        .with("image", enter_image, exit_node)
        .with("labelText", noop, exit_label_text)
        .with("resourceDestinationString", noop, exit_destination)
        .with("resourceTitleString", noop, exit_title)
        .with("htmlFlow", enter_html, exit_html)
        .with("htmlText", enter_html, exit_html)
}

/// Literal text is delivered when its token closes, so a value token
/// wrapping nested `data` tokens yields the same text either way.
pub fn enter_data(_ctx: &mut CompileContext<'_>, _token: &Token) -> CompileResult<()> {
    Ok(())
}

pub fn exit_data(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    ctx.data(token)
}

/// Closes the current node.
pub fn exit_node(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    ctx.pop(token)
}

fn exit_atx_heading_sequence(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    let depth = ctx.slice(token).trim().len() as i64;
    ctx.current_mut()?.data.set("depth", depth);
    Ok(())
}

fn exit_setext_heading_sequence(
    ctx: &mut CompileContext<'_>,
    token: &Token,
) -> CompileResult<()> {
    let depth = if ctx.slice(token).trim_start().starts_with('=') {
        1i64
    } else {
        2
    };
    ctx.current_mut()?.data.set("depth", depth);
    Ok(())
}

fn enter_list(ctx: &mut CompileContext<'_>, token: &Token, ordered: bool) -> CompileResult<()> {
    let mut node = Node::new("list", token.span);
    node.data.set("ordered", ordered);
    ctx.push(node, token);
    Ok(())
}

fn enter_list_ordered(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    enter_list(ctx, token, true)
}

fn enter_list_unordered(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    enter_list(ctx, token, false)
}

fn enter_code_text(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    ctx.push(Node::new("inlineCode", token.span), token);
    ctx.begin()
}

fn exit_code_text(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    let value = ctx.resume()?;
    ctx.current_mut()?.value = value;
    ctx.pop(token)
}

fn enter_code(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    ctx.push(Node::new("code", token.span), token);
    ctx.begin()
}

fn exit_code(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    let value = ctx.resume()?;
    ctx.current_mut()?.value = value;
    ctx.pop(token)
}

fn exit_code_info(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    let lang = ctx.text(token).to_string();
    ctx.current_mut()?.data.set("lang", lang);
    Ok(())
}

fn exit_code_meta(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    let meta = ctx.text(token).to_string();
    ctx.current_mut()?.data.set("meta", meta);
    Ok(())
}

/// Image alt text. Link labels are delivered as ordinary children.
fn exit_label_text(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    let alt = ctx.text(token).to_string();
    let node = ctx.current_mut()?;
    if node.is("image") {
        node.data.set_property("alt", alt);
    }
    Ok(())
}

fn exit_destination(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    let url = ctx.text(token).to_string();
    ctx.current_mut()?.data.set_property("url", url);
    Ok(())
}

fn exit_title(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    let title = ctx.text(token).to_string();
    ctx.current_mut()?.data.set_property("title", title);
    Ok(())
}

fn exit_html(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    let html = ctx.text(token).to_string();
    ctx.current_mut()?.value = html;
    ctx.pop(token)
}
