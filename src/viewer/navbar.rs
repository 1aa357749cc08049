//! Fixed top navigation bar with a scroll-driven style toggle.

use egui::{Color32, RichText, TopBottomPanel};

/// Scroll offset (logical pixels) past which the bar picks up a dark fill.
pub const SCROLL_THRESHOLD: f32 = 50.0;

const NAV_LINKS: [&str; 4] = ["Home", "About", "Projects", "Contact"];

pub struct Navbar {
    scrolled: bool,
}

impl Navbar {
    pub fn new() -> Self {
        Self { scrolled: false }
    }

    /// Feed the current page scroll offset; flips the single style bit.
    pub fn update_scroll(&mut self, offset: f32) {
        self.scrolled = offset > SCROLL_THRESHOLD;
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    /// Draw the bar. Returns true when "Home" was clicked so the caller can
    /// scroll the page back to the top.
    pub fn show(&mut self, ctx: &egui::Context) -> bool {
        let fill = if self.scrolled {
            Color32::from_black_alpha(204)
        } else {
            Color32::TRANSPARENT
        };

        let mut home_clicked = false;
        TopBottomPanel::top("navbar")
            .frame(
                egui::Frame::NONE
                    .fill(fill)
                    .inner_margin(egui::Margin::symmetric(16, 10)),
            )
            .show_separator_line(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("VITRINE")
                            .strong()
                            .size(20.0)
                            .color(Color32::WHITE),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        for item in NAV_LINKS.iter().rev() {
                            if ui
                                .link(RichText::new(*item).color(Color32::from_gray(220)))
                                .clicked()
                                && *item == "Home"
                            {
                                home_clicked = true;
                            }
                            ui.add_space(12.0);
                        }
                    });
                });
            });
        home_clicked
    }
}

impl Default for Navbar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_threshold() {
        let mut nav = Navbar::new();
        assert!(!nav.is_scrolled());

        nav.update_scroll(0.0);
        assert!(!nav.is_scrolled());

        // Exactly at the threshold stays transparent; past it goes dark
        nav.update_scroll(SCROLL_THRESHOLD);
        assert!(!nav.is_scrolled());
        nav.update_scroll(SCROLL_THRESHOLD + 1.0);
        assert!(nav.is_scrolled());

        // Scrolling back up reverts the style
        nav.update_scroll(10.0);
        assert!(!nav.is_scrolled());
    }
}
