//! Commands and command handlers
//!
//! A command is an immutable intent value. Each application defines its commands
//! as one closed enum implementing [`Command`]; the enum's [`Command::Kind`] tag
//! is what the [`CommandDispatcher`] routes on, so two commands of the same kind
//! are interchangeable for routing purposes.

use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::hash::Hash;

pub mod dispatcher;

pub use dispatcher::CommandDispatcher;

/// A routable intent value
///
/// `kind` should be an exhaustive `match` over the application's command
/// variants, so a new variant cannot be added without giving it a tag.
pub trait Command: Send + 'static {
    /// Routing tag; its `Display` output names the command type in errors
    type Kind: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// Value produced by a successful handler
    type Output: Send + 'static;

    /// Handler-domain error, passed through the dispatcher unchanged
    type Error: Send + 'static;

    fn kind(&self) -> Self::Kind;

    /// Every kind in the closed command set
    fn kinds() -> &'static [Self::Kind];
}

/// Performs the effect associated with one command kind
#[async_trait]
pub trait CommandHandler<C: Command>: Send + Sync {
    async fn handle(&self, command: C) -> Result<C::Output, C::Error>;
}

#[async_trait]
impl<C, F, Fut> CommandHandler<C> for F
where
    C: Command,
    F: Fn(C) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<C::Output, C::Error>> + Send + 'static,
{
    async fn handle(&self, command: C) -> Result<C::Output, C::Error> {
        (self)(command).await
    }
}
