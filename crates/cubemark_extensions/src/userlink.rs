//! User-link extension: `@name` links to a user's profile.

use cubemark_compiler::{
    CompileContext, CompileResult, CompilerConfig, DelimitedSyntax, Extension, HandlerTable, Syntax,
    Token,
};

use crate::capture::{enter_value, exit_value, open_buffered};

pub const USERLINK: &str = "userlink";
pub const USERLINK_VALUE: &str = "userlinkValue";

#[derive(Debug, Clone, Copy, Default)]
pub struct Userlink;

impl Userlink {
    pub fn syntax() -> DelimitedSyntax {
        DelimitedSyntax::inline_word(USERLINK, "@")
    }

    pub fn handlers() -> HandlerTable {
        HandlerTable::new()
            .with(USERLINK, enter_userlink, exit_userlink)
            .with(USERLINK_VALUE, enter_value, exit_value)
    }
}

impl Extension for Userlink {
    fn name(&self) -> &str {
        USERLINK
    }

    fn configure(&self, config: &mut CompilerConfig) {
        config
            .add_syntax(self.name(), Syntax::Delimited(Self::syntax()))
            .add_handlers(self.name(), Self::handlers());
    }
}

fn enter_userlink(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    open_buffered(ctx, token, USERLINK)
}

fn exit_userlink(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    let name = ctx.resume()?;
    let node = ctx.current_mut()?;
    node.data.set_property("name", name.as_str());
    node.value = name;
    ctx.pop(token)
}
