//! Output contract enforcement: token rules, the mutating sanitizer,
//! the pure validator gate and the crisis reply gate.

mod crisis_gate;
mod fix_table;
mod sanitizer;
mod tokens;
mod validator;

pub use crisis_gate::{gate_crisis_reply, CrisisGateIssue, CrisisGateReport};
pub use fix_table::{FixEntry, FixTable};
pub use sanitizer::{sanitize_cards, sanitize_step};
pub use tokens::{
    cjk_len, has_metric_token, has_trigger_marker, is_cjk, split_completion, step_has_token,
    STEP_CJK_BUDGET,
};
pub use validator::{
    validate_action_cards, validate_next_steps_lines, validate_reply, ContractIssue, GateReport,
};
