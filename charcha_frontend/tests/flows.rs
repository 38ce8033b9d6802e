use std::time::{Duration, Instant};

use charcha_frontend::api::ApiError;
use charcha_frontend::flows::feed::{CommentsRequest, FeedState, LikeAction, LikeTarget};
use charcha_frontend::flows::reset::{ResetEvent, ResetFlow, ResetRequest, ResetResponse, ResetStep};
use charcha_frontend::flows::{Notice, ValidationError};
use charcha_frontend::models::{
    Comment, CreateCommentPayload, LikeReceipt, Post, ResetPasswordPayload, SendOtpPayload,
    VerifyOtpPayload,
};
use pretty_assertions::assert_eq;
use serde_json::json;

const DELAY: Duration = Duration::from_millis(1200);

fn post(id: i64, like_count: i64) -> Post {
    serde_json::from_value(json!({
        "id": id,
        "userId": 9,
        "userFirstName": "Ravi",
        "title": "2BHK in Kothrud",
        "content": "Near the park",
        "createdAt": "2024-03-05T10:15:00Z",
        "likeCount": like_count,
        "commentCount": 1,
        "media": []
    }))
    .unwrap()
}

fn comment(id: i64) -> Comment {
    serde_json::from_value(json!({
        "id": id,
        "userId": 4,
        "comment": "Is parking included?",
        "likeCount": 0,
        "replies": null
    }))
    .unwrap()
}

fn receipt(count: i64) -> LikeReceipt {
    LikeReceipt {
        success: true,
        message: String::new(),
        like_count: Some(count),
    }
}

#[test]
fn password_reset_walks_all_three_steps() {
    let mut flow = ResetFlow::new(DELAY);
    let start = Instant::now();

    let request = flow.submit_email("a@b.com").unwrap();
    assert_eq!(
        request,
        ResetRequest::SendCode {
            email: "a@b.com".into()
        }
    );
    flow.apply(
        ResetResponse::CodeSent(Ok(SendOtpPayload {
            success: true,
            message: "OTP sent".into(),
            channels: vec!["email".into(), "sms".into()],
        })),
        start,
    );
    assert!(matches!(flow.notice(), Some(Notice::Success(_))));
    assert_eq!(flow.tick(start), ResetEvent::Idle);
    assert_eq!(flow.tick(start + DELAY), ResetEvent::Advanced(ResetStep::Otp));
    assert_eq!(flow.notice(), None);

    flow.submit_otp("123456").unwrap();
    flow.apply(
        ResetResponse::CodeVerified(Ok(VerifyOtpPayload {
            success: true,
            message: "Verified".into(),
            user_info: None,
        })),
        start,
    );
    assert_eq!(
        flow.tick(start + DELAY),
        ResetEvent::Advanced(ResetStep::NewPassword)
    );

    let request = flow.submit_new_password("Secret1", "Secret1").unwrap();
    assert_eq!(request.step(), ResetStep::NewPassword);
    flow.apply(
        ResetResponse::PasswordReset(Ok(ResetPasswordPayload {
            success: true,
            message: "Password updated".into(),
            user_info: None,
        })),
        start,
    );
    assert_eq!(flow.tick(start + DELAY), ResetEvent::Completed);
    assert!(flow.is_complete());
    assert_eq!(flow.session().email, "a@b.com");
}

fn flow_at_new_password() -> ResetFlow {
    let mut flow = ResetFlow::new(Duration::ZERO);
    let now = Instant::now();
    flow.submit_email("a@b.com").unwrap();
    let sent = SendOtpPayload {
        success: true,
        ..Default::default()
    };
    flow.apply(ResetResponse::CodeSent(Ok(sent)), now);
    flow.tick(now);
    flow.submit_otp("123456").unwrap();
    let verified = VerifyOtpPayload {
        success: true,
        ..Default::default()
    };
    flow.apply(ResetResponse::CodeVerified(Ok(verified)), now);
    flow.tick(now);
    flow
}

#[test]
fn mismatched_passwords_never_reach_the_server() {
    let mut flow = flow_at_new_password();
    assert_eq!(
        flow.submit_new_password("Secret1", "Secret2"),
        Err(ValidationError::PasswordMismatch)
    );
    assert!(!flow.is_busy());
    assert_eq!(flow.step(), ResetStep::NewPassword);
    assert_eq!(
        flow.notice(),
        Some(&Notice::Error("Passwords do not match.".into()))
    );
}

#[test]
fn differing_password_pairs_are_all_refused_locally() {
    let pairs = [
        ("secret", "Secret"),
        ("Secret1", "Secret1 "),
        (" Secret1", "Secret1"),
        ("", "Secret1"),
        ("Secret1", ""),
        ("pässwörd", "passwörd"),
        ("गुप्त123", "गुप्त124"),
        ("e\u{301}", "\u{e9}"),
    ];
    let mut flow = flow_at_new_password();
    for (password, confirm) in pairs {
        let result = flow.submit_new_password(password, confirm);
        assert!(
            matches!(
                result,
                Err(ValidationError::PasswordMismatch | ValidationError::PasswordMissing)
            ),
            "{password:?} / {confirm:?} gave {result:?}"
        );
        assert!(!flow.is_busy(), "{password:?} / {confirm:?} left a request in flight");
        assert_eq!(flow.step(), ResetStep::NewPassword);
        assert!(flow.notice().is_some_and(Notice::is_error));
    }
}

#[test]
fn failed_otp_request_stays_on_email_step() {
    let mut flow = ResetFlow::new(DELAY);
    let now = Instant::now();
    flow.submit_email("a@b.com").unwrap();
    flow.apply(
        ResetResponse::CodeSent(Err(ApiError::Transport("connection refused".into()))),
        now,
    );
    assert_eq!(flow.tick(now + DELAY), ResetEvent::Idle);
    assert_eq!(flow.step(), ResetStep::Email);
    assert!(flow.notice().is_some_and(Notice::is_error));
    assert!(flow.submit_email("a@b.com").is_ok());
}

#[test]
fn liking_a_post_twice_only_sends_once() {
    let mut feed = FeedState::new(3, 1, 10);
    feed.load().unwrap();
    feed.apply_feed(Ok(vec![post(42, 10)]));

    let target = LikeTarget::Post(42);
    let first = feed.toggle_like(target).unwrap();
    assert_eq!(first.action, LikeAction::Like);
    assert_eq!(feed.toggle_like(target), None);
    assert!(feed.toggle_like(LikeTarget::Comment(7)).is_some());
}

#[test]
fn like_then_unlike_follows_server_counts() {
    let mut feed = FeedState::new(3, 1, 10);
    feed.load().unwrap();
    feed.apply_feed(Ok(vec![post(42, 10)]));
    let target = LikeTarget::Post(42);
    assert_eq!(feed.engagement(target, 10).like_count, 10);

    let like = feed.toggle_like(target).unwrap();
    assert_eq!(like.user_id, 3);
    feed.apply_like(like, Ok(receipt(11)));
    let shown = feed.engagement(target, 10);
    assert!(shown.liked);
    assert_eq!(shown.like_count, 11);

    let unlike = feed.toggle_like(target).unwrap();
    assert_eq!(unlike.action, LikeAction::Unlike);
    feed.apply_like(unlike, Ok(receipt(10)));
    let shown = feed.engagement(target, 10);
    assert!(!shown.liked);
    assert_eq!(shown.like_count, 10);
}

#[test]
fn like_then_unlike_returns_to_the_start() {
    for target in [LikeTarget::Post(42), LikeTarget::Comment(42)] {
        for initial in [0, 1, 10, 2_500] {
            let mut feed = FeedState::new(3, 1, 10);
            let start = feed.engagement(target, initial);

            let like = feed.toggle_like(target).unwrap();
            assert_eq!(like.action, LikeAction::Like);
            feed.apply_like(like, Ok(receipt(initial + 1)));
            assert!(feed.engagement(target, initial).liked);

            let unlike = feed.toggle_like(target).unwrap();
            assert_eq!(unlike.action, LikeAction::Unlike);
            feed.apply_like(unlike, Ok(receipt(initial)));

            assert_eq!(feed.engagement(target, initial), start, "{target:?} from {initial}");
            assert!(!feed.is_like_pending(target));
        }
    }
}

#[test]
fn rejected_like_leaves_count_untouched() {
    let mut feed = FeedState::new(3, 1, 10);
    let target = LikeTarget::Post(42);
    let like = feed.toggle_like(target).unwrap();
    feed.apply_like(
        like,
        Ok(LikeReceipt {
            success: false,
            message: "Already liked".into(),
            like_count: None,
        }),
    );
    assert_eq!(feed.engagement(target, 10).like_count, 10);
    assert_eq!(feed.error(), Some("Already liked"));
    assert!(!feed.is_like_pending(target));
}

#[test]
fn empty_comments_are_remembered_separately_from_unfetched() {
    let mut feed = FeedState::new(3, 1, 10);
    assert_eq!(feed.comments(7), None);

    let request = feed.expand(7).unwrap();
    assert_eq!(request, CommentsRequest { post_id: 7 });
    assert!(feed.is_loading_comments(7));
    feed.apply_comments(7, Ok(Vec::new()));

    assert_eq!(feed.comments(7), Some(&[][..]));
    assert_eq!(feed.expand(7), None);
    assert_eq!(feed.comments(8), None);
}

#[test]
fn replies_landing_together_both_refresh_the_panel() {
    let mut feed = FeedState::new(3, 1, 10);
    feed.expand(7).unwrap();
    feed.apply_comments(7, Ok(vec![comment(1), comment(2)]));

    let first = feed.reply(1, 7, "Is the lift working?").unwrap();
    let second = feed.reply(2, 7, "Pets allowed?").unwrap();
    let saved = CreateCommentPayload {
        success: true,
        ..Default::default()
    };

    let refetch = feed.apply_reply(&first, Ok(saved.clone()));
    assert_eq!(refetch, Some(CommentsRequest { post_id: 7 }));
    assert_eq!(feed.apply_reply(&second, Ok(saved)), None);

    let follow_up = feed.apply_comments(7, Ok(vec![comment(1), comment(2)]));
    assert_eq!(follow_up, Some(CommentsRequest { post_id: 7 }));
    assert_eq!(feed.apply_comments(7, Ok(vec![comment(1)])), None);
}

#[test]
fn whitespace_reply_sends_nothing() {
    let mut feed = FeedState::new(3, 1, 10);
    feed.expand(7).unwrap();
    feed.apply_comments(7, Ok(vec![comment(5)]));

    *feed.reply_draft_mut(5) = "   ".into();
    let draft = feed.reply_draft(5).to_string();
    assert_eq!(feed.reply(5, 7, &draft), None);
    assert!(!feed.is_reply_pending(5));
}

#[test]
fn successful_reply_refetches_comments() {
    let mut feed = FeedState::new(3, 1, 10);
    feed.expand(7).unwrap();
    feed.apply_comments(7, Ok(vec![comment(5)]));
    assert_eq!(feed.comments(7).map(|list| list[0].post_id), Some(7));

    *feed.reply_draft_mut(5) = "Yes, one slot".into();
    let request = feed.reply(5, 7, "Yes, one slot").unwrap();
    assert_eq!(request.parent_comment_id, 5);
    assert!(feed.is_reply_pending(5));

    let refetch = feed.apply_reply(
        &request,
        Ok(CreateCommentPayload {
            success: true,
            ..Default::default()
        }),
    );
    assert_eq!(refetch, Some(CommentsRequest { post_id: 7 }));
    assert_eq!(feed.reply_draft(5), "");
    assert!(!feed.is_reply_pending(5));
}
