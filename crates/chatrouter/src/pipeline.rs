//! Argument transformation pipeline
//!
//! Walks a command's argument slots in order and fills `Context::args`:
//!
//! - a plain slot takes one token
//! - a remainder slot takes every remaining token joined with single spaces
//! - a greedy slot takes tokens while its transform succeeds and yields a list
//! - an optional slot with no input left is skipped
//!
//! Tokens left over after the last slot are dropped.

use tracing::debug;

use crate::context::Context;
use crate::error::{BoxError, Result, RouterError};
use crate::types::{ArgValue, Command};

/// Transform raw tokens into argument values for `command`
///
/// Values are pushed onto `ctx.args` as they are produced, so on failure the
/// context holds every argument transformed before the failing slot.
pub fn transform_args(command: &Command, tokens: &[String], ctx: &mut Context<'_>) -> Result<()> {
    let mut cursor = 0;

    for (index, spec) in command.args.iter().enumerate() {
        let remaining = &tokens[cursor.min(tokens.len())..];

        if remaining.is_empty() {
            if spec.optional {
                debug!(command = %command.name, spec_index = index, "Optional argument omitted");
                continue;
            }
            return Err(RouterError::MissingArgument {
                command: command.name.clone(),
                spec_index: index,
            });
        }

        if spec.remainder {
            let joined = remaining.join(" ");
            let value = spec
                .transform(ctx, &joined)
                .map_err(|cause| transform_failure(command, index, cause))?;
            ctx.args.push(value);
            cursor = tokens.len();
            break;
        }

        if spec.greedy {
            let mut values = Vec::new();
            let mut first_error = None;
            for raw in remaining {
                match spec.transform(ctx, raw) {
                    Ok(value) => values.push(value),
                    Err(cause) => {
                        first_error = Some(cause);
                        break;
                    }
                }
            }

            if values.is_empty() {
                if spec.optional {
                    continue;
                }
                if let Some(cause) = first_error {
                    return Err(transform_failure(command, index, cause));
                }
            }

            debug!(
                command = %command.name,
                spec_index = index,
                consumed = values.len(),
                "Greedy argument collected"
            );
            cursor += values.len();
            ctx.args.push(ArgValue::List(values));
            continue;
        }

        let value = spec
            .transform(ctx, &remaining[0])
            .map_err(|cause| transform_failure(command, index, cause))?;
        ctx.args.push(value);
        cursor += 1;
    }

    if cursor < tokens.len() {
        debug!(
            command = %command.name,
            discarded = tokens.len() - cursor,
            "Discarding extra tokens"
        );
    }

    Ok(())
}

fn transform_failure(command: &Command, spec_index: usize, cause: BoxError) -> RouterError {
    RouterError::TransformFailure {
        command: command.name.clone(),
        spec_index,
        cause,
    }
}
