use tokio_util::sync::CancellationToken;

use catalog_service::domain::tag::{NewTag, Tag, TagListQuery};
use catalog_service::repository::errors::RepositoryError;
use catalog_service::repository::{
    DieselRepository, ProductReader, TagReader, TagWriter, UnitOfWork,
};
use catalog_service::services::ServiceError;
use catalog_service::services::products;
use catalog_service::services::tags::{attach_tags, reconcile_tags};

mod common;

fn all_tags(repo: &DieselRepository) -> Vec<Tag> {
    repo.run(&CancellationToken::new(), |store| {
        store.list_tags(TagListQuery::default())
    })
    .expect("list tags")
    .1
}

fn tag_names(repo: &DieselRepository, product_id: i32) -> Vec<String> {
    repo.run(&CancellationToken::new(), |store| {
        store.get_product_by_id(product_id)
    })
    .expect("load product")
    .expect("product exists")
    .tags
    .into_iter()
    .map(|tag| tag.name)
    .collect()
}

#[test]
fn blank_tag_lists_create_nothing() {
    let test_db = common::TestDb::new("blank_tag_lists_create_nothing.db");
    let repo = DieselRepository::new(test_db.pool());
    let cancel = CancellationToken::new();

    let summary = products::create_product(
        &repo,
        &cancel,
        &common::admin(),
        common::product_payload("BLANK-1", &["", "   ", "\t"]),
        common::now(),
    )
    .expect("create product");

    assert!(all_tags(&repo).is_empty());
    assert!(tag_names(&repo, summary.id).is_empty());
}

#[test]
fn names_differing_by_case_or_whitespace_share_a_tag() {
    let test_db = common::TestDb::new("names_differing_by_case_share_a_tag.db");
    let repo = DieselRepository::new(test_db.pool());
    let cancel = CancellationToken::new();
    let now = common::now();

    let resolved = repo
        .run(&cancel, |store| {
            reconcile_tags(
                store,
                &[vec![" Shoes ".to_string()], vec!["shoes".to_string()]],
                now,
            )
        })
        .expect("reconcile");

    assert_eq!(resolved[0].len(), 1);
    assert_eq!(resolved[0][0].id, resolved[1][0].id);
    assert_eq!(resolved[0][0].name, "Shoes");
    assert_eq!(all_tags(&repo).len(), 1);
}

#[test]
fn existing_tag_is_reused_for_every_casing() {
    let test_db = common::TestDb::new("existing_tag_is_reused_for_every_casing.db");
    let repo = DieselRepository::new(test_db.pool());
    let cancel = CancellationToken::new();
    let now = common::now();

    let existing = repo
        .run(&cancel, |store| {
            store.create_tag(&NewTag::new("Electronics", now))
        })
        .expect("seed tag");

    let summary = products::create_product(
        &repo,
        &cancel,
        &common::admin(),
        common::product_payload("TV-1", &["electronics", "Electronics", "ELECTRONICS"]),
        now,
    )
    .expect("create product");

    let tags = all_tags(&repo);
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].id, existing.id);
    assert_eq!(tag_names(&repo, summary.id), vec!["Electronics".to_string()]);
}

#[test]
fn bulk_batch_creates_each_new_tag_once() {
    let test_db = common::TestDb::new("bulk_batch_creates_each_new_tag_once.db");
    let repo = DieselRepository::new(test_db.pool());
    let cancel = CancellationToken::new();

    let created = products::create_products_bulk(
        &repo,
        &cancel,
        &common::admin(),
        vec![
            common::product_payload("A", &["red", "blue"]),
            common::product_payload("B", &["blue", "green"]),
        ],
        common::now(),
    )
    .expect("bulk create");
    assert_eq!(created.count, 2);

    let mut names: Vec<String> = all_tags(&repo).into_iter().map(|tag| tag.name).collect();
    names.sort();
    assert_eq!(names, vec!["blue", "green", "red"]);

    let first = tag_names(&repo, created.products[0].id);
    let second = tag_names(&repo, created.products[1].id);
    assert_eq!(first, vec!["red", "blue"]);
    assert_eq!(second, vec!["blue", "green"]);
}

#[test]
fn second_request_reuses_committed_tags() {
    let test_db = common::TestDb::new("second_request_reuses_committed_tags.db");
    let repo = DieselRepository::new(test_db.pool());
    let cancel = CancellationToken::new();
    let now = common::now();

    for sku in ["IDEM-1", "IDEM-2"] {
        products::create_product(
            &repo,
            &cancel,
            &common::admin(),
            common::product_payload(sku, &["Sale", "new"]),
            now,
        )
        .expect("create product");
    }

    let tags = all_tags(&repo);
    assert_eq!(tags.len(), 2);
}

#[test]
fn tag_names_round_trip_trimmed_with_first_casing() {
    let test_db = common::TestDb::new("tag_names_round_trip_trimmed.db");
    let repo = DieselRepository::new(test_db.pool());
    let cancel = CancellationToken::new();

    let summary = products::create_product(
        &repo,
        &cancel,
        &common::admin(),
        common::product_payload("RT-1", &["A", "b", " c "]),
        common::now(),
    )
    .expect("create product");

    let view = products::get_product(&repo, &cancel, summary.id).expect("load product");
    assert_eq!(view.tags, vec!["A", "b", "c"]);
}

#[test]
fn failure_inside_unit_of_work_rolls_back_new_tags() {
    let test_db = common::TestDb::new("failure_inside_unit_of_work_rolls_back.db");
    let repo = DieselRepository::new(test_db.pool());
    let cancel = CancellationToken::new();
    let now = common::now();

    let err = repo
        .run(&cancel, |store| {
            let resolved = reconcile_tags(store, &[vec!["Rollback".to_string()]], now)?;
            attach_tags(store, 999, &resolved[0])
        })
        .expect_err("linking a missing product should fail");
    assert!(matches!(err, RepositoryError::Database(_)));

    assert!(all_tags(&repo).is_empty());
}

#[test]
fn cancelled_unit_of_work_commits_nothing() {
    let test_db = common::TestDb::new("cancelled_unit_of_work_commits_nothing.db");
    let repo = DieselRepository::new(test_db.pool());
    let cancel = CancellationToken::new();
    let now = common::now();

    let err = repo
        .run(&cancel, |store| {
            store.create_tag(&NewTag::new("Cancelled", now))?;
            cancel.cancel();
            store.create_tag(&NewTag::new("Never", now))
        })
        .expect_err("cancelled work should fail");
    assert!(matches!(err, RepositoryError::Cancelled));
    assert!(all_tags(&repo).is_empty());

    let service_err = products::create_product(
        &repo,
        &cancel,
        &common::admin(),
        common::product_payload("CANCEL-1", &["x"]),
        now,
    )
    .expect_err("already cancelled");
    assert_eq!(service_err, ServiceError::Cancelled);
}

#[test]
fn deleting_a_product_keeps_its_tags() {
    let test_db = common::TestDb::new("deleting_a_product_keeps_its_tags.db");
    let repo = DieselRepository::new(test_db.pool());
    let cancel = CancellationToken::new();
    let now = common::now();

    let summary = products::create_product(
        &repo,
        &cancel,
        &common::admin(),
        common::product_payload("DEL-1", &["Keep", "Me"]),
        now,
    )
    .expect("create product");

    products::delete_product(&repo, &cancel, &common::admin(), summary.id)
        .expect("delete product");

    assert_eq!(all_tags(&repo).len(), 2);

    let again = products::create_product(
        &repo,
        &cancel,
        &common::admin(),
        common::product_payload("DEL-2", &["keep"]),
        now,
    )
    .expect("create product");
    assert_eq!(tag_names(&repo, again.id), vec!["Keep".to_string()]);
    assert_eq!(all_tags(&repo).len(), 2);
}

#[test]
fn too_long_tag_name_writes_nothing() {
    let test_db = common::TestDb::new("too_long_tag_name_writes_nothing.db");
    let repo = DieselRepository::new(test_db.pool());
    let cancel = CancellationToken::new();
    let long_name = "x".repeat(5000);

    let err = products::create_product(
        &repo,
        &cancel,
        &common::admin(),
        common::product_payload("LONG-1", &["fine", long_name.as_str()]),
        common::now(),
    )
    .expect_err("tag name over the limit");

    assert!(matches!(err, ServiceError::Form(_)));
    assert!(all_tags(&repo).is_empty());
    assert!(
        repo.run(&cancel, |store| store.get_product_by_sku("LONG-1"))
            .expect("lookup")
            .is_none()
    );
}

#[test]
fn stored_tags_read_back_in_creation_order() {
    let test_db = common::TestDb::new("stored_tags_read_back_in_creation_order.db");
    let repo = DieselRepository::new(test_db.pool());
    let cancel = CancellationToken::new();
    let now = common::now();

    repo.run(&cancel, |store| store.create_tag(&NewTag::new("alpha", now)))
        .expect("seed tag");

    let summary = products::create_product(
        &repo,
        &cancel,
        &common::admin(),
        common::product_payload("ORDER-1", &["zeta", "alpha"]),
        now,
    )
    .expect("create product");

    assert_eq!(tag_names(&repo, summary.id), vec!["alpha", "zeta"]);
}
