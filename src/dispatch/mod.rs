//! Node dispatch shared by every pass over the syntax tree.
//!
//! A pass implements [`dispatch::Visitor`] and hands nodes to
//! [`dispatch::dispatch`], which selects the single handler for the node's
//! kind. The match in `dispatch` is exhaustive, so adding a node kind
//! without a handler slot does not compile; a pass that reaches a kind it
//! never overrode fails at run time with a fatal internal error.

pub mod dispatch;

#[cfg(test)]
mod tests;
