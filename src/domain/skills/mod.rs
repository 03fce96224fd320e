//! Coping skill registry, selection and rendering.

mod registry;
mod render;
mod selection;
mod skill;
mod tier;

pub use registry::SkillRegistry;
pub use render::{render_skills, RenderedPlan};
pub use selection::select_skills;
pub use skill::{ActionCard, Applicability, Effort, Skill, SkillSelection, SlotKind, SlotSpec};
pub use tier::{infer_tier, RiskTier};
