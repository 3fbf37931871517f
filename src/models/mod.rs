pub mod checklist;
pub mod draft;
pub mod trip;
