//! Announcement post texts and the markers read back out of them
//!
//! Every string the engine scrapes from a rendered post is defined here, next
//! to the template that produces it.

use crate::timer::TimerCodec;
use tombstone_domain::policy::LOW_SCORE;
use tombstone_domain::{Post, Timestamp};

/// Title given to new announcement posts
pub const ANNOUNCEMENT_TITLE: &str = "职员帖：删除宣告";

/// Words that must all appear in a post title for it to count as the announcement
pub const ANNOUNCEMENT_KEYWORDS: [&str; 2] = ["职员", "删除宣告"];

/// Precedes the score in a score-based notice
pub const SCORE_MARKER: &str = "条目的分数为";

/// Present in any post whose countdown has been stopped
pub const RECOVERY_MARKER: &str = "分数回升";

/// Body written over the announcement when a countdown is rescinded
pub const RESCIND_NOTICE: &str = "【分数回升，倒计时停止】";

/// How an announcement body reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Score-based notice on an original page
    Normal,
    /// Poor-translation notice on a derivative page
    Translate,
    /// Countdown already stopped
    Rescinded,
}

impl NoticeKind {
    /// Classify a post body
    pub fn of(body: &str) -> Self {
        if body.contains(RECOVERY_MARKER) {
            NoticeKind::Rescinded
        } else if body.contains(SCORE_MARKER) {
            NoticeKind::Normal
        } else {
            NoticeKind::Translate
        }
    }
}

/// Signed integer immediately following `marker` in `text`
pub fn extract_int_after(text: &str, marker: &str) -> Option<i64> {
    let start = text.find(marker)? + marker.len();
    let rest = &text[start..];
    let sign_len = usize::from(rest.starts_with('-') || rest.starts_with('+'));
    let digits = rest[sign_len..]
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, c)| sign_len + i + c.len_utf8())?;
    rest[..digits].parse().ok()
}

/// Whether a post is the staff deletion announcement
///
/// With a non-empty `staff` list the author must also be listed.
pub fn is_announcement(post: &Post, staff: &[String]) -> bool {
    ANNOUNCEMENT_KEYWORDS.iter().all(|k| post.title.contains(k))
        && (staff.is_empty() || staff.iter().any(|s| s == &post.author))
}

/// First announcement post in thread order
pub fn find_announcement<'a>(posts: &'a [Post], staff: &[String]) -> Option<&'a Post> {
    posts.iter().find(|post| is_announcement(post, staff))
}

/// Renders announcement bodies
#[derive(Debug, Clone, Default)]
pub struct NoticeWriter {
    codec: TimerCodec,
}

impl NoticeWriter {
    /// Writer embedding timers through `codec`
    pub fn new(codec: TimerCodec) -> Self {
        Self { codec }
    }

    /// Score-based notice
    pub fn normal(&self, score: i64, deadline: Timestamp) -> String {
        let matured = if score > LOW_SCORE {
            "且距离发布时间已满1个月，"
        } else {
            ""
        };
        format!(
            "由于{}{}分，{}现根据[[[deletions-policy|删除政策]]]，宣告将删除此页：\n{}\n\
             如果你不是作者又想要重写该条目，请在此帖回复申请。请先取得作者的同意，并将原文的源代码复制至沙盒里。\
             除非你是工作人员，否则请勿就申请重写以外的范围回复此帖。",
            SCORE_MARKER,
            score,
            matured,
            self.codec.embed(deadline)
        )
    }

    /// Poor-translation notice
    pub fn translate(&self, deadline: Timestamp) -> String {
        format!("由于翻译质量不佳，宣告删除。\n{}", self.codec.embed(deadline))
    }
}
