use foodstore_sync::{CoordinatorError, NewComment, Operation, StoreStatistics};

use crate::support::{huerta, loaded, panaderia};

#[tokio::test]
async fn create_edit_delete_round_trip() {
    let directory = loaded("u1").await;
    let store = huerta();
    assert_eq!(directory.statistics().unwrap().bucket("s1"), None);

    let created = directory
        .create_comment(NewComment::new("u1", "s1", "Muy bueno").recommended(true))
        .await
        .unwrap();
    assert_eq!(
        directory.statistics_for(&store).unwrap(),
        StoreStatistics {
            recommendation_count: 1,
            total_comments: 1,
            viewer_has_commented: true,
            viewer_has_recommended: true,
        }
    );

    directory
        .update_comment(&created, created.content.clone(), false)
        .await
        .unwrap();
    assert_eq!(
        directory.statistics_for(&store).unwrap(),
        StoreStatistics {
            recommendation_count: 0,
            total_comments: 1,
            viewer_has_commented: true,
            viewer_has_recommended: false,
        }
    );

    directory.delete_comment(&created.id).await.unwrap();
    assert_eq!(directory.statistics().unwrap().bucket("s1"), None);
    assert_eq!(
        directory.statistics_for(&store).unwrap(),
        StoreStatistics::default()
    );
}

#[tokio::test]
async fn created_comment_lands_at_head() {
    let directory = loaded("u1").await;

    let created = directory
        .comment_on(&panaderia(), "Recomendado", true)
        .await
        .unwrap();

    let snapshot = directory.snapshot().unwrap();
    assert_eq!(snapshot.comments()[0].id, created.id);
    assert_eq!(snapshot.comments()[0].user_id, "u1");
    assert_eq!(directory.statistics_for(&panaderia()).unwrap().total_comments, 3);
}

#[tokio::test]
async fn failed_create_changes_nothing() {
    let directory = loaded("u1").await;
    directory.select(&panaderia()).unwrap();
    let before = directory.selection().unwrap().unwrap().comments;
    directory
        .transport()
        .fail_next(Operation::CreateComment, "No autorizado");

    let err = directory
        .comment_on(&panaderia(), "Hola", false)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "No autorizado");
    assert!(matches!(
        err,
        CoordinatorError::Mutation {
            operation: Operation::CreateComment,
            status: Some(500),
            ..
        }
    ));
    assert_eq!(directory.snapshot().unwrap().comments().len(), 2);
    assert_eq!(directory.selection().unwrap().unwrap().comments, before);
}

#[tokio::test]
async fn directory_stays_usable_after_a_failure() {
    let directory = loaded("u1").await;
    directory
        .transport()
        .fail_next(Operation::DeleteComment, "Error");

    directory.delete_comment("c2").await.unwrap_err();
    directory.delete_comment("c2").await.unwrap();

    assert_eq!(directory.snapshot().unwrap().comments().len(), 1);
}

#[tokio::test]
async fn whitespace_comment_is_rejected_locally() {
    let directory = loaded("u1").await;

    let err = directory
        .comment_on(&huerta(), " \t\n", true)
        .await
        .unwrap_err();

    assert!(matches!(err, CoordinatorError::Validation(_)));
    assert_eq!(directory.transport().call_count(Operation::CreateComment), 0);
}

#[tokio::test]
async fn whitespace_edit_is_rejected_locally() {
    let directory = loaded("u2").await;
    let comment = directory.snapshot().unwrap().comments()[0].clone();

    let err = directory
        .update_comment(&comment, "   ", true)
        .await
        .unwrap_err();

    assert!(matches!(err, CoordinatorError::Validation(_)));
    assert_eq!(directory.transport().call_count(Operation::UpdateComment), 0);
}

#[tokio::test]
async fn anonymous_session_cannot_comment() {
    use foodstore_sync::{Session, StoreDirectory, StoreQuery};

    let directory = StoreDirectory::new(crate::support::transport(), Session::new());
    directory.load(&StoreQuery::default()).await.unwrap();

    let err = directory
        .comment_on(&huerta(), "Hola", false)
        .await
        .unwrap_err();
    assert_eq!(err, CoordinatorError::MissingViewer);
}

#[tokio::test]
async fn viewer_flags_reflect_existing_comments() {
    let directory = loaded("u2").await;
    let stats = directory.statistics_for(&panaderia()).unwrap();

    assert_eq!(stats.total_comments, 2);
    assert_eq!(stats.recommendation_count, 1);
    assert!(stats.viewer_has_commented);
    assert!(stats.viewer_has_recommended);
}
