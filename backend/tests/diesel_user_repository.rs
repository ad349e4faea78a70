//! Diesel user repository against embedded PostgreSQL.

use car_catalogue::domain::password::PasswordDigest;
use car_catalogue::domain::ports::{NewUserRecord, UserPersistenceError, UserRepository};
use car_catalogue::domain::{EmailAddress, UserId, Username};
use car_catalogue::outbound::persistence::DieselUserRepository;
use rstest::rstest;

mod support;

use support::provision_database;

fn record(username: &str, email: &str) -> NewUserRecord {
    NewUserRecord {
        username: Username::new(username).expect("valid username"),
        email: EmailAddress::new(email).expect("valid email"),
        password: PasswordDigest::hash("correct horse battery"),
    }
}

#[tokio::test]
async fn created_users_can_be_found() {
    let Some(db) = provision_database().await else {
        return;
    };
    let repo = DieselUserRepository::new(db.pool.clone());

    let created = repo
        .create(&record("ada", "ada@example.com"))
        .await
        .expect("insert user");

    let by_name = repo
        .find_by_username("ada")
        .await
        .expect("lookup")
        .expect("user exists");
    assert_eq!(by_name.user, created);
    assert!(by_name.password.verify("correct horse battery"));
    assert!(!by_name.password.verify("wrong"));

    let by_id = repo
        .find_by_id(created.id())
        .await
        .expect("lookup")
        .expect("user exists");
    assert_eq!(by_id.email().as_str(), "ada@example.com");

    assert!(repo.find_by_username("grace").await.expect("lookup").is_none());
    assert!(repo.find_by_id(UserId::new(9_999)).await.expect("lookup").is_none());
}

#[rstest]
#[case(("ada", "other@example.com"), "username")]
#[case(("grace", "ada@example.com"), "email")]
#[tokio::test]
async fn duplicates_name_the_conflicting_field(
    #[case] second: (&str, &str),
    #[case] field: &str,
) {
    let Some(db) = provision_database().await else {
        return;
    };
    let repo = DieselUserRepository::new(db.pool.clone());
    repo.create(&record("ada", "ada@example.com"))
        .await
        .expect("insert user");

    let err = repo
        .create(&record(second.0, second.1))
        .await
        .expect_err("duplicate rejected");

    assert_eq!(err, UserPersistenceError::duplicate(field));
}
