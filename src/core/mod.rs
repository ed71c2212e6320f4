//! Core console machinery with zero optional dependencies.
//!
//! The building blocks:
//! - [`ConsoleRegistry`] - variable store and command metadata
//! - [`ConsoleCommand`] / [`CommandHandlers`] / [`VarCallbacks`] - callback binding
//! - [`tokenize`] - quote- and paren-aware tokenizer
//! - [`Evaluator`] - recursive fixed-precedence expression evaluator
//! - [`exec`] - `;`-separated statement dispatch
//! - [`ConsoleHistory`] - persisted command history
//! - [`autocomplete`] - shortest-prefix-match completion
//! - [`ConsoleLog`] - bounded severity-tagged output ring
//! - [`ConsoleView`] - open/close slide state
//! - Messages for communication with the host

mod command;
mod complete;
mod console;
mod dispatch;
mod eval;
mod events;
mod history;
mod log;
mod registry;
mod tokenizer;
mod trie;
mod value;
mod view;

pub use command::{CommandHandler, CommandHandlers, CommandMeta, ConsoleCommand, VarCallback, VarCallbacks};
pub use complete::autocomplete;
pub use console::{Console, ConsoleRef};
pub use dispatch::{ExecContext, PendingEffects, eval_expr, exec, set_variable};
pub(crate) use dispatch::{PendingLines, dispatch_pending_lines, flush_pending_effects, queue_input_lines};
pub use eval::{Evaluator, SIGIL};
pub use events::{
    ConsoleEventsPlugin, ConsoleInputEvent, ConsoleToggleEvent, PlaySoundRequest, VarChangedEvent,
};
pub use history::{ConsoleHistory, DEFAULT_HISTORY_FILE};
pub use log::{ConsoleLog, LOG_CAPACITY, LOG_TARGET, LogLine, Severity};
pub use registry::ConsoleRegistry;
pub use tokenizer::{Token, TokenKind, tokenize};
pub use trie::NameTrie;
pub use value::{ConsoleValue, Rgb, Value, fmt_number};
pub use view::{ConsoleView, SLIDE_STEP};
