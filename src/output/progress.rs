use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright, bright_green, bright_yellow};

/// Spinner per phase of a status run, drawn on stderr.
pub struct PhaseProgress {
    pb: ProgressBar,
    visible: bool,
}

impl PhaseProgress {
    pub fn start_phase_1(visible: bool) -> Self {
        if visible {
            eprintln!("{}  {}", bright("⚙️"), bright("Phases").underlined());
        }
        let pb = create_spinner(
            bright_yellow("Phase 1/3: Fetching starred repositories").to_string(),
            visible,
        );
        Self { pb, visible }
    }

    pub fn finish_phase_1_start_phase_2(self, repository_count: usize) -> Self {
        self.pb.finish_with_message(
            bright_green(format!(
                "Phase 1/3: Found {repository_count} starred repositories ✓"
            ))
            .to_string(),
        );
        let pb = create_spinner(
            bright_yellow("Phase 2/3: Fetching branches, tags and merge requests").to_string(),
            self.visible,
        );
        Self {
            pb,
            visible: self.visible,
        }
    }

    pub fn finish_phase_2_start_phase_3(self, aggregated: usize, skipped: usize) -> Self {
        self.pb.finish_with_message(
            bright_green(format!(
                "Phase 2/3: Aggregated {aggregated} repositories ({skipped} skipped) ✓"
            ))
            .to_string(),
        );
        let pb = create_spinner(
            bright_yellow("Phase 3/3: Classifying release state").to_string(),
            self.visible,
        );
        Self {
            pb,
            visible: self.visible,
        }
    }

    pub fn finish_phase_3(self) {
        self.pb
            .finish_with_message(bright_green("Phase 3/3: Classification complete ✓").to_string());
        if self.visible {
            eprintln!();
        }
    }
}

fn create_spinner(message: String, visible: bool) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if visible {
        pb.set_draw_target(ProgressDrawTarget::stderr());
    } else {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    if let Ok(style) = ProgressStyle::default_spinner().template("  {msg} {spinner}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    if visible {
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
    }
    pb
}
