//! Typed marketplace records
//!
//! One module per contract generation. Bundle records mirror an event's
//! arguments; per-item records are produced from them by [`crate::split`].
//! Every record built from a log carries the originating [`LogRef`].
//!
//! [`LogRef`]: crate::abi::LogRef

pub mod v1;
pub mod v2;
pub mod v3;

use ethabi::Token;

use crate::abi::{DecodingError, EventArgs};

/// Components of a returned struct
///
/// A call returning one struct decodes to a single tuple token; some nodes
/// and ABIs flatten it into the component list instead. Both shapes map to
/// the same positional arguments.
pub(crate) fn struct_components(args: EventArgs) -> Result<EventArgs, DecodingError> {
    let context = args.event().to_string();
    let mut tokens = args.into_tokens();
    if tokens.len() == 1 && matches!(tokens[0], Token::Tuple(_)) {
        if let Some(Token::Tuple(components)) = tokens.pop() {
            return Ok(EventArgs::from_tokens(context, components));
        }
    }
    Ok(EventArgs::from_tokens(context, tokens))
}
