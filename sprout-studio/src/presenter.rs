//! Plain-text rendering of a resolved progression for the terminal

use std::fmt::Write;

use sprout_path::{Progression, QueuedAction};

/// Render path, action queue and timeline as one block of text
pub fn render_progression(child_name: &str, progression: &Progression) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}'s path", child_name);
    if progression.ordered_path.is_empty() {
        let _ = writeln!(out, "  (no milestones yet)");
    }
    for node in progression.ordered_path.iter() {
        let season = &node.season;
        let marker = if node.primary { ">" } else { " " };
        let _ = write!(
            out,
            " {} {} #{} {} [{} {}]",
            marker,
            node.badge,
            node.id(),
            node.milestone.title,
            season.icon(),
            season.label
        );
        if let Some(tag) = node.tag {
            let _ = write!(out, " ({})", tag);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "\nTo do");
    for (index, entry) in progression.action_queue.entries().iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", index + 1, render_action(entry));
    }

    if !progression.timeline.is_empty() {
        let _ = writeln!(out, "\nTimeline");
        for entry in &progression.timeline {
            let event = &entry.event;
            let _ = write!(out, "  {} {} {}", event.date, event.icon, event.title);
            if let Some(status) = &event.status {
                let _ = write!(out, " [{:?}]", status);
            }
            if entry.viewable {
                let _ = write!(out, " (video)");
            }
            let _ = writeln!(out);
        }
    }

    out
}

fn render_action(entry: &QueuedAction) -> String {
    let action = &entry.action;
    match entry.target {
        Some(milestone_id) => format!(
            "{} {} -> {} (milestone {})",
            entry.icon, action.title, action.action_label, milestone_id
        ),
        None => format!("{} {}", entry.icon, action.title),
    }
}
