use qa_subscriptions::{
    models::{
        AnswerRef, CommentRef, EventSource, Notification, NotificationFilter, NotificationKind,
        Subscription, SubscriptionFilter, UserRef,
    },
    services::{NotificationRepository, SubscriptionRepository},
    utils::MemoryStore,
    AppState, Config,
};
use std::sync::Arc;

fn setup() -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(Config::default(), store.clone(), store.clone());
    (state, store)
}

async fn subscriptions_matching(store: &MemoryStore, filter: SubscriptionFilter) -> Vec<Subscription> {
    SubscriptionRepository::find_many(store, &filter).await.unwrap()
}

async fn notifications_matching(store: &MemoryStore, filter: NotificationFilter) -> Vec<Notification> {
    NotificationRepository::find_many(store, &filter).await.unwrap()
}

#[tokio::test]
async fn subscribe_twice_keeps_one_row() {
    let (state, store) = setup();
    let user = UserRef::new("u1");
    let answer = AnswerRef::new("a1", "owner");

    let first = state.subscription_service.subscribe(&user, &answer).await.unwrap();
    let second = state.subscription_service.subscribe(&user, &answer).await.unwrap();

    assert!(first.is_created());
    assert!(!second.is_created());
    assert_eq!(first.subscription().id, second.subscription().id);
    assert_eq!(store.subscription_count(), 1);
}

#[tokio::test]
async fn absent_references_are_no_ops() {
    let (state, store) = setup();
    let service = &state.subscription_service;
    let user = UserRef::new("u1");
    let answer = AnswerRef::new("a1", "owner");
    let comment = EventSource::comment("c1");

    service.subscribe(&user, &answer).await.unwrap();
    service
        .notify(Some(&comment), Some(&answer), NotificationKind::Commented)
        .await
        .unwrap();
    let (subs, notes) = (store.subscription_count(), store.notification_count());

    assert_eq!(service.unsubscribe(None, Some(&answer)).await.unwrap(), None);
    assert_eq!(service.unsubscribe(Some(&user), None).await.unwrap(), None);
    assert_eq!(service.destruct(None).await.unwrap(), None);
    assert_eq!(service.notify(None, Some(&answer), NotificationKind::Commented).await.unwrap(), None);
    assert_eq!(service.notify(Some(&comment), None, NotificationKind::Commented).await.unwrap(), None);
    assert_eq!(service.denotify(None, Some(&answer)).await.unwrap(), None);
    assert_eq!(service.denotify(Some(&comment), None).await.unwrap(), None);

    assert_eq!(store.subscription_count(), subs);
    assert_eq!(store.notification_count(), notes);
}

#[tokio::test]
async fn destruct_removes_every_subscriber() {
    let (state, store) = setup();
    let answer = AnswerRef::new("a1", "owner");
    let other = AnswerRef::new("a2", "owner");
    for id in ["u1", "u2", "u3", "u4"] {
        state.subscription_service.subscribe(&UserRef::new(id), &answer).await.unwrap();
    }
    state.subscription_service.subscribe(&UserRef::new("u1"), &other).await.unwrap();

    let removed = state.subscription_service.destruct(Some(&answer)).await.unwrap();

    assert_eq!(removed, Some(4));
    assert!(subscriptions_matching(&store, SubscriptionFilter::answer("a1")).await.is_empty());
    assert_eq!(subscriptions_matching(&store, SubscriptionFilter::answer("a2")).await.len(), 1);
}

#[tokio::test]
async fn owner_is_never_notified() {
    let (state, store) = setup();
    let answer = AnswerRef::new("a1", "owner");
    state.subscription_service.subscribe(&answer.owner(), &answer).await.unwrap();
    state.subscription_service.subscribe(&UserRef::new("s1"), &answer).await.unwrap();

    let created = state
        .subscription_service
        .notify(Some(&EventSource::comment("c1")), Some(&answer), NotificationKind::Commented)
        .await
        .unwrap();

    assert_eq!(created, Some(1));
    assert!(notifications_matching(&store, NotificationFilter::recipient("owner")).await.is_empty());
}

#[tokio::test]
async fn fan_out_creates_one_notification_per_subscriber() {
    let (state, store) = setup();
    let answer = AnswerRef::new("a1", "owner");
    let comment = EventSource::comment("c1");
    for id in ["s1", "s2", "s3"] {
        state.subscription_service.subscribe(&UserRef::new(id), &answer).await.unwrap();
    }

    let created = state
        .subscription_service
        .notify(Some(&comment), Some(&answer), NotificationKind::Commented)
        .await
        .unwrap();

    assert_eq!(created, Some(3));
    let mut recipients: Vec<String> = notifications_matching(&store, NotificationFilter::target(&comment))
        .await
        .into_iter()
        .map(|n| {
            assert!(n.is_new);
            assert_eq!(n.notification_type, NotificationKind::Commented);
            assert_eq!(n.target(), Some(comment.clone()));
            n.recipient_id
        })
        .collect();
    recipients.sort();
    assert_eq!(recipients, vec!["s1", "s2", "s3"]);
}

#[tokio::test]
async fn denotify_retracts_what_notify_created() {
    let (state, store) = setup();
    let answer = AnswerRef::new("a1", "owner");
    let comment = EventSource::comment("c1");
    let unrelated = EventSource::comment("c2");
    for id in ["s1", "s2"] {
        state.subscription_service.subscribe(&UserRef::new(id), &answer).await.unwrap();
    }
    let service = &state.subscription_service;
    service.notify(Some(&comment), Some(&answer), NotificationKind::Commented).await.unwrap();
    service.notify(Some(&unrelated), Some(&answer), NotificationKind::Commented).await.unwrap();

    let removed = service.denotify(Some(&comment), Some(&answer)).await.unwrap();

    assert_eq!(removed, Some(2));
    assert!(notifications_matching(&store, NotificationFilter::target(&comment)).await.is_empty());
    assert_eq!(notifications_matching(&store, NotificationFilter::target(&unrelated)).await.len(), 2);
}

#[tokio::test]
async fn unsubscribe_round_trip() {
    let (state, store) = setup();
    let user = UserRef::new("u1");
    let answer = AnswerRef::new("a1", "owner");
    let service = &state.subscription_service;

    service.subscribe(&user, &answer).await.unwrap();
    let removed = service.unsubscribe(Some(&user), Some(&answer)).await.unwrap();

    assert_eq!(removed.map(|s| s.user_id), Some("u1".to_string()));
    assert!(!service.is_subscribed(&user, &answer).await.unwrap());
    assert_eq!(store.subscription_count(), 0);
    assert_eq!(service.unsubscribe(Some(&user), Some(&answer)).await.unwrap(), None);
}

#[tokio::test]
async fn comment_lifecycle_through_hooks() {
    let (state, store) = setup();
    let hooks = &state.activity_hooks;
    let answer = AnswerRef::new("a1", "owner");

    hooks.answer_created(&answer).await.unwrap();

    // 回答作者评论：只有作者订阅，没有人收到通知
    let own_comment = CommentRef::new("c1", "owner", "a1");
    assert_eq!(hooks.comment_created(&own_comment, &answer).await.unwrap(), Some(0));

    // 其他用户评论后自动订阅
    let reply = CommentRef::new("c2", "visitor", "a1");
    assert_eq!(hooks.comment_created(&reply, &answer).await.unwrap(), Some(1));
    assert!(state
        .subscription_service
        .is_subscribed(&UserRef::new("visitor"), &answer)
        .await
        .unwrap());
    assert_eq!(
        state.notification_service.unread_count(&UserRef::new("visitor")).await.unwrap(),
        1
    );

    let follow_up = CommentRef::new("c3", "owner", "a1");
    assert_eq!(hooks.comment_created(&follow_up, &answer).await.unwrap(), Some(1));
    let inbox = state
        .notification_service
        .notifications_for(&UserRef::new("visitor"))
        .await
        .unwrap();
    assert_eq!(inbox.len(), 2);

    assert_eq!(hooks.comment_destroyed(&follow_up, &answer).await.unwrap(), Some(1));
    assert_eq!(
        state.notification_service.unread_count(&UserRef::new("visitor")).await.unwrap(),
        1
    );

    assert_eq!(hooks.answer_destroyed(&answer).await.unwrap(), Some(2));
    assert_eq!(store.subscription_count(), 0);
}
