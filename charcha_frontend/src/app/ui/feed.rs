use std::collections::HashSet;

use eframe::egui::{self, Color32, RichText};

use crate::app::format_timestamp;
use crate::app::state::{HomeState, Route, UiAction};
use crate::flows::feed::{FeedState, FeedStatus, LikeTarget};
use crate::models::{Comment, CommentId, Post, PostId};

const MAX_REPLY_INDENT: usize = 6;

/// Interactions collected while the feed is borrowed for drawing.
enum FeedIntent {
    ToggleLike(LikeTarget),
    ToggleComments(PostId),
    StartReply(CommentId),
    CancelReply,
    SendReply { parent: CommentId, post_id: PostId },
    DismissError,
}

/// Read-only view of the home state for one frame, plus the reply box text.
struct FeedFrame<'a> {
    feed: &'a FeedState,
    open_panels: &'a HashSet<PostId>,
    replying_to: Option<CommentId>,
    reply_input: &'a mut String,
    intents: Vec<FeedIntent>,
}

pub fn render(ui: &mut egui::Ui, home: &mut HomeState, actions: &mut Vec<UiAction>) {
    let HomeState {
        feed,
        open_panels,
        replying_to,
        reply_input,
    } = home;
    let mut frame = FeedFrame {
        feed,
        open_panels,
        replying_to: *replying_to,
        reply_input,
        intents: Vec::new(),
    };
    let feed = frame.feed;

    if let Some(err) = feed.error() {
        ui.horizontal(|ui| {
            ui.colored_label(Color32::LIGHT_RED, err);
            if ui.small_button("✕").clicked() {
                frame.intents.push(FeedIntent::DismissError);
            }
        });
        ui.separator();
    }

    match feed.status() {
        FeedStatus::Idle | FeedStatus::Loading => {
            ui.add(egui::Spinner::new());
        }
        FeedStatus::Failed(err) => {
            ui.colored_label(Color32::LIGHT_RED, format!("Error loading posts: {err}"));
            if ui.button("Retry").clicked() {
                actions.push(UiAction::Navigate(Route::Home));
            }
        }
        FeedStatus::Loaded(posts) if posts.is_empty() => {
            ui.label("No posts yet.");
        }
        FeedStatus::Loaded(posts) => {
            egui::ScrollArea::vertical().show(ui, |ui| {
                for post in posts {
                    egui::Frame::group(ui.style())
                        .fill(ui.visuals().extreme_bg_color)
                        .inner_margin(egui::vec2(12.0, 8.0))
                        .show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            render_post(ui, &mut frame, post);
                        });
                    ui.add_space(8.0);
                }
            });
        }
    }

    let intents = frame.intents;
    apply_intents(home, intents, actions);
}

fn apply_intents(home: &mut HomeState, intents: Vec<FeedIntent>, actions: &mut Vec<UiAction>) {
    let feed_id = home.feed.id();
    for intent in intents {
        match intent {
            FeedIntent::ToggleLike(target) => {
                if let Some(request) = home.feed.toggle_like(target) {
                    actions.push(UiAction::Like { feed_id, request });
                }
            }
            FeedIntent::ToggleComments(post_id) => {
                if !home.open_panels.remove(&post_id) {
                    home.open_panels.insert(post_id);
                    if let Some(request) = home.feed.expand(post_id) {
                        actions.push(UiAction::LoadComments { feed_id, request });
                    }
                }
            }
            FeedIntent::StartReply(comment_id) => {
                stash_reply(home);
                home.replying_to = Some(comment_id);
                home.reply_input = home.feed.reply_draft(comment_id).to_string();
            }
            FeedIntent::CancelReply => {
                stash_reply(home);
                home.replying_to = None;
            }
            FeedIntent::SendReply { parent, post_id } => {
                *home.feed.reply_draft_mut(parent) = home.reply_input.clone();
                if let Some(request) = home.feed.reply(parent, post_id, &home.reply_input) {
                    actions.push(UiAction::Reply { feed_id, request });
                }
            }
            FeedIntent::DismissError => home.feed.dismiss_error(),
        }
    }
}

fn stash_reply(home: &mut HomeState) {
    if let Some(open) = home.replying_to {
        *home.feed.reply_draft_mut(open) = std::mem::take(&mut home.reply_input);
    }
}

fn render_post(ui: &mut egui::Ui, frame: &mut FeedFrame<'_>, post: &Post) {
    if let Some(cover) = post.cover_image() {
        ui.add(
            egui::Image::from_uri(cover.media_url.as_str())
                .max_height(220.0)
                .rounding(4.0),
        );
    }

    ui.horizontal(|ui| {
        ui.label(RichText::new(&post.title).strong().size(16.0));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(RichText::new(format_timestamp(&post.created_at)).small());
        });
    });
    ui.horizontal(|ui| {
        ui.label(post.author_name());
        if let Some(role) = &post.author_role {
            ui.label(RichText::new(role).weak());
        }
    });
    ui.horizontal_wrapped(|ui| {
        if let Some(price) = &post.price {
            ui.label(RichText::new(price.to_string()).strong());
        }
        if let Some(kind) = &post.property_type {
            ui.label(kind);
        }
        if let Some(location) = &post.location {
            ui.label(format!("📍 {location}"));
        }
        if let Some(status) = &post.status {
            ui.label(RichText::new(status).weak());
        }
    });
    ui.add_space(4.0);
    ui.label(&post.content);
    ui.add_space(4.0);

    let open = frame.open_panels.contains(&post.id);
    ui.horizontal(|ui| {
        let target = LikeTarget::Post(post.id);
        if like_button(ui, frame.feed, target, post.like_count) {
            frame.intents.push(FeedIntent::ToggleLike(target));
        }
        let label = if open {
            "Hide comments".to_string()
        } else {
            format!("💬 {} comments", post.comment_count)
        };
        if ui.button(label).clicked() {
            frame.intents.push(FeedIntent::ToggleComments(post.id));
        }
    });

    if open {
        ui.separator();
        render_comment_panel(ui, frame, post.id);
    }
}

fn render_comment_panel(ui: &mut egui::Ui, frame: &mut FeedFrame<'_>, post_id: PostId) {
    let feed = frame.feed;
    if feed.is_loading_comments(post_id) {
        ui.add(egui::Spinner::new());
    }
    match feed.comments(post_id) {
        None => {}
        Some([]) => {
            ui.label(RichText::new("No comments yet.").weak());
        }
        Some(comments) => {
            for comment in comments {
                render_comment(ui, frame, comment, 0);
            }
        }
    }
}

fn render_comment(ui: &mut egui::Ui, frame: &mut FeedFrame<'_>, comment: &Comment, depth: usize) {
    ui.horizontal(|ui| {
        ui.add_space(depth.min(MAX_REPLY_INDENT) as f32 * 16.0);
        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(comment.author_name()).strong());
                if let Some(role) = &comment.author_role {
                    ui.label(RichText::new(role).weak());
                }
                if let Some(at) = comment.commented_at.as_ref().or(comment.added_at.as_ref()) {
                    ui.label(RichText::new(format_timestamp(at)).small());
                }
            });
            ui.label(&comment.text);

            let replying = frame.replying_to == Some(comment.id);
            ui.horizontal(|ui| {
                let target = LikeTarget::Comment(comment.id);
                if like_button(ui, frame.feed, target, comment.like_count) {
                    frame.intents.push(FeedIntent::ToggleLike(target));
                }
                if ui.selectable_label(replying, "Reply").clicked() {
                    frame.intents.push(if replying {
                        FeedIntent::CancelReply
                    } else {
                        FeedIntent::StartReply(comment.id)
                    });
                }
            });
            if replying {
                render_reply_box(ui, frame, comment);
            }
        });
    });
    for reply in &comment.replies {
        render_comment(ui, frame, reply, depth + 1);
    }
}

fn render_reply_box(ui: &mut egui::Ui, frame: &mut FeedFrame<'_>, comment: &Comment) {
    let pending = frame.feed.is_reply_pending(comment.id);
    ui.horizontal(|ui| {
        ui.add_enabled(
            !pending,
            egui::TextEdit::singleline(&mut *frame.reply_input)
                .hint_text("Write a reply…")
                .desired_width(320.0),
        );
        if ui.add_enabled(!pending, egui::Button::new("Send")).clicked() {
            frame.intents.push(FeedIntent::SendReply {
                parent: comment.id,
                post_id: comment.post_id,
            });
        }
        if pending {
            ui.add(egui::Spinner::new());
        }
    });
}

/// Like toggle showing the confirmed count. Returns true when clicked.
fn like_button(ui: &mut egui::Ui, feed: &FeedState, target: LikeTarget, server_count: i64) -> bool {
    let engagement = feed.engagement(target, server_count);
    let icon = if engagement.liked { "♥" } else { "♡" };
    let text = RichText::new(format!("{icon} {}", engagement.like_count));
    let text = if engagement.liked {
        text.color(Color32::LIGHT_RED)
    } else {
        text
    };
    ui.add_enabled(!feed.is_like_pending(target), egui::Button::new(text))
        .clicked()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn home() -> HomeState {
        HomeState::new(FeedState::new(3, 1, 10))
    }

    #[test]
    fn moving_the_reply_box_keeps_each_draft() {
        let mut home = home();
        let mut actions = Vec::new();
        apply_intents(&mut home, vec![FeedIntent::StartReply(1)], &mut actions);
        home.reply_input.push_str("Parking?");
        apply_intents(&mut home, vec![FeedIntent::StartReply(2)], &mut actions);

        assert_eq!(home.replying_to, Some(2));
        assert_eq!(home.reply_input, "");
        assert_eq!(home.feed.reply_draft(1), "Parking?");

        apply_intents(&mut home, vec![FeedIntent::StartReply(1)], &mut actions);
        assert_eq!(home.reply_input, "Parking?");
        assert!(actions.is_empty());
    }

    #[test]
    fn send_reply_dispatches_once() {
        let mut home = home();
        let mut actions = Vec::new();
        apply_intents(&mut home, vec![FeedIntent::StartReply(5)], &mut actions);
        home.reply_input.push_str("Is it east facing?");
        let send = || FeedIntent::SendReply {
            parent: 5,
            post_id: 7,
        };
        apply_intents(&mut home, vec![send(), send()], &mut actions);

        assert_eq!(actions.len(), 1);
        let Some(UiAction::Reply { request, .. }) = actions.first() else {
            panic!("expected a reply action");
        };
        assert_eq!(request.text, "Is it east facing?");
        assert_eq!(request.post_id, 7);
        assert!(home.feed.is_reply_pending(5));
    }

    #[test]
    fn whitespace_reply_dispatches_nothing() {
        let mut home = home();
        let mut actions = Vec::new();
        apply_intents(&mut home, vec![FeedIntent::StartReply(5)], &mut actions);
        home.reply_input.push_str("   ");
        let send = FeedIntent::SendReply {
            parent: 5,
            post_id: 7,
        };
        apply_intents(&mut home, vec![send], &mut actions);
        assert!(actions.is_empty());
        assert_eq!(home.reply_input, "   ");
    }

    #[test]
    fn comment_panel_fetches_on_first_open_only() {
        let mut home = home();
        let mut actions = Vec::new();
        apply_intents(&mut home, vec![FeedIntent::ToggleComments(7)], &mut actions);
        assert!(home.open_panels.contains(&7));
        assert!(matches!(actions.as_slice(), [UiAction::LoadComments { .. }]));

        home.feed.apply_comments(7, Ok(Vec::new()));
        let toggles = vec![FeedIntent::ToggleComments(7), FeedIntent::ToggleComments(7)];
        apply_intents(&mut home, toggles, &mut actions);
        assert!(home.open_panels.contains(&7));
        assert_eq!(actions.len(), 1);
    }
}
