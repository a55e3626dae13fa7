use super::*;

#[tokio::test(start_paused = true)]
async fn notice_visible_within_window() {
    let mut board = NoticeBoard::new();
    board.post("已开机");
    tokio::time::advance(Duration::from_millis(2_999)).await;
    assert_eq!(board.current(), Some("已开机"));
}

#[tokio::test(start_paused = true)]
async fn notice_expires_after_window() {
    let mut board = NoticeBoard::new();
    board.post("已开机");
    tokio::time::advance(NOTICE_TTL).await;
    assert_eq!(board.current(), None);
    assert!(board.clear_expired());
    assert_eq!(board.deadline(), None);
}

#[tokio::test(start_paused = true)]
async fn new_notice_replaces_and_restarts_timer() {
    let mut board = NoticeBoard::new();
    board.post("first");
    tokio::time::advance(Duration::from_secs(2)).await;
    board.post("second");
    tokio::time::advance(Duration::from_secs(2)).await;
    assert_eq!(board.current(), Some("second"));
    tokio::time::advance(Duration::from_secs(1)).await;
    assert_eq!(board.current(), None);
}

#[tokio::test(start_paused = true)]
async fn deadline_tracks_latest_post() {
    let mut board = NoticeBoard::new();
    assert!(board.deadline().is_none());
    board.post("x");
    let posted = Instant::now();
    assert_eq!(board.deadline(), Some(posted + NOTICE_TTL));
}

#[tokio::test(start_paused = true)]
async fn clear_expired_keeps_live_notice() {
    let mut board = NoticeBoard::new();
    board.post("live");
    assert!(!board.clear_expired());
    assert_eq!(board.current(), Some("live"));
}

#[test]
fn empty_board_has_nothing_to_clear() {
    let mut board = NoticeBoard::new();
    assert!(!board.clear_expired());
    assert!(board.current().is_none());
}
