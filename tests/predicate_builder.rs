//! End-to-end tests for predicate compilation: rendering of every
//! comparator kind, boolean combination and grouping, subqueries, and the
//! cross-scope misuse errors.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::sync::Arc;

use predikit::{
    AggregateComparison, AnyEntity, FieldCache, Matchable, NilComparable, Predicate,
    PredicateError, PredicateValue, StringOptions, SubqueryMatch,
};

struct Kraken;
predikit::reflectable!(Kraken {
    title,
    age,
    isAwesome,
    birthdate,
    friends,
    bestFriend,
});

struct Cerberus;
predikit::reflectable!(Cerberus {
    title,
    age,
    isHungry,
    isAwesome,
    birthdate,
    subordinates,
});

struct Elf;
predikit::reflectable!(Elf { title, enemies });

#[test]
fn test_empty_callback_compiles_to_always_false() {
    let predicate = Predicate::build::<Kraken, _>(|_| {});
    assert_eq!(predicate.expression(), "FALSEPREDICATE");
    assert!(predicate.arguments().is_empty());
    assert!(predicate.is_always_false());
}

#[test]
fn test_string_comparators() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.string("title").equals("Kraken", StringOptions::NONE);
    });
    assert_eq!(predicate.expression(), r#"title == "Kraken""#);
    assert!(predicate.arguments().is_empty());

    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.string("title").begins_with("Kra", StringOptions::NONE);
    });
    assert_eq!(predicate.expression(), r#"title BEGINSWITH "Kra""#);

    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.string("title").ends_with("ken", StringOptions::NONE);
    });
    assert_eq!(predicate.expression(), r#"title ENDSWITH "ken""#);

    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.string("title").contains("rak", StringOptions::NONE);
    });
    assert_eq!(predicate.expression(), r#"title CONTAINS "rak""#);

    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.string("title").matches("K.*n", StringOptions::NONE);
    });
    assert_eq!(predicate.expression(), r#"title MATCHES "K.*n""#);

    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.string("title").is_empty();
    });
    assert_eq!(predicate.expression(), r#"title == """#);
}

#[test]
fn test_string_option_suffixes() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.string("title").equals("kraken", StringOptions::CASE_INSENSITIVE);
    });
    assert_eq!(predicate.expression(), r#"title ==[c] "kraken""#);

    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.string("title")
            .contains("krake", StringOptions::DIACRITIC_INSENSITIVE);
    });
    assert_eq!(predicate.expression(), r#"title CONTAINS[d] "krake""#);

    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.string("title")
            .begins_with("kra", StringOptions::CASE_AND_DIACRITIC_INSENSITIVE);
    });
    assert_eq!(predicate.expression(), r#"title BEGINSWITH[cd] "kra""#);
}

#[test]
fn test_string_operand_escaping() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.string("title").equals(r#"say "hi""#, StringOptions::NONE);
    });
    assert_eq!(predicate.expression(), r#"title == "say \"hi\"""#);
}

#[test]
fn test_number_comparators_bind_placeholders() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.number("age").equals(5);
    });
    assert_eq!(predicate.expression(), "age == %@");
    assert_eq!(predicate.arguments(), &[PredicateValue::Int(5)]);

    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.number("age").does_not_equal(5);
    });
    assert_eq!(predicate.expression(), "age != %@");

    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.number("age").is_greater_than(5);
    });
    assert_eq!(predicate.expression(), "age > %@");

    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.number("age").is_less_than(5);
    });
    assert_eq!(predicate.expression(), "age < %@");

    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.number("age").is_greater_than_or_equal_to(5);
    });
    assert_eq!(predicate.expression(), "age >= %@");

    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.number("age").is_less_than_or_equal_to(2.5);
    });
    assert_eq!(predicate.expression(), "age <= %@");
    assert_eq!(predicate.arguments(), &[PredicateValue::Float(2.5)]);
}

#[test]
fn test_date_comparators() {
    let birthday = Utc.with_ymd_and_hms(1815, 10, 18, 0, 0, 0).unwrap();

    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.date("birthdate").equals(birthday);
    });
    assert_eq!(predicate.expression(), "birthdate == %@");
    assert_eq!(predicate.arguments(), &[PredicateValue::DateTime(birthday)]);

    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.date("birthdate").is_earlier_than(birthday);
    });
    assert_eq!(predicate.expression(), "birthdate < %@");

    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.date("birthdate").is_later_than(birthday);
    });
    assert_eq!(predicate.expression(), "birthdate > %@");

    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.date("birthdate").is_earlier_than_or_on(birthday);
    });
    assert_eq!(predicate.expression(), "birthdate <= %@");

    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.date("birthdate").is_later_than_or_on(birthday);
    });
    assert_eq!(predicate.expression(), "birthdate >= %@");
}

#[test]
fn test_boolean_comparators_inline_literals() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.boolean("isAwesome").is_true();
    });
    assert_eq!(predicate.expression(), "isAwesome == true");
    assert!(predicate.arguments().is_empty());

    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.boolean("isAwesome").is_false();
    });
    assert_eq!(predicate.expression(), "isAwesome == false");
}

#[test]
fn test_equals_nil_binds_nothing() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.string("title").equals_nil();
    });
    assert_eq!(predicate.expression(), "title == nil");
    assert!(predicate.arguments().is_empty());
}

#[test]
fn test_matches_any_value_in_binds_one_list_argument() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.number("age").matches_any_value_in([1i64, 2, 3]);
    });
    assert_eq!(predicate.expression(), "age IN %@");
    assert_eq!(
        predicate.arguments(),
        &[PredicateValue::List(vec![
            PredicateValue::Int(1),
            PredicateValue::Int(2),
            PredicateValue::Int(3),
        ])]
    );
}

#[test]
fn test_and_chains_stay_flat() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        let title = q.string("title").equals("Kraken", StringOptions::NONE);
        let age = q.number("age").is_greater_than(5);
        let awesome = q.boolean("isAwesome").is_true();
        title.and(&age).and(&awesome);
    });
    assert_eq!(
        predicate.expression(),
        r#"(title == "Kraken" && age > %@ && isAwesome == true)"#
    );
    assert_eq!(predicate.arguments(), &[PredicateValue::Int(5)]);
}

#[test]
fn test_or_chains_stay_flat() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        let a = q.number("age").equals(1);
        let b = q.number("age").equals(2);
        let c = q.number("age").equals(3);
        a.or(&b).or(&c);
    });
    assert_eq!(predicate.expression(), "(age == %@ || age == %@ || age == %@)");
    assert_eq!(
        predicate.arguments(),
        &[
            PredicateValue::Int(1),
            PredicateValue::Int(2),
            PredicateValue::Int(3),
        ]
    );
}

#[test]
fn test_operator_switch_forces_nesting() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        let a = q.string("title").equals("Kraken", StringOptions::NONE);
        let b = q.number("age").is_greater_than(5);
        let c = q.boolean("isAwesome").is_true();
        a.and(&b).or(&c);
    });
    assert_eq!(
        predicate.expression(),
        r#"((title == "Kraken" && age > %@) || isAwesome == true)"#
    );
}

#[test]
fn test_explicit_grouping() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        let a = q.number("age").equals(1);
        let b = q.number("age").equals(2);
        let c = q.number("age").equals(3);
        let d = q.number("age").equals(4);
        let left = a.or(&b);
        let right = c.or(&d);
        left.and(&right);
    });
    assert_eq!(
        predicate.expression(),
        "((age == %@ || age == %@) && (age == %@ || age == %@))"
    );
    assert_eq!(
        predicate.arguments(),
        &[
            PredicateValue::Int(1),
            PredicateValue::Int(2),
            PredicateValue::Int(3),
            PredicateValue::Int(4),
        ]
    );
}

#[test]
fn test_grouped_same_kind_chains_concatenate() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        let a = q.number("age").equals(1);
        let b = q.number("age").equals(2);
        let c = q.number("age").equals(3);
        let d = q.number("age").equals(4);
        let left = a.and(&b);
        let right = c.and(&d);
        left.and(&right);
    });
    assert_eq!(
        predicate.expression(),
        "(age == %@ && age == %@ && age == %@ && age == %@)"
    );
}

#[test]
fn test_compound_does_not_resurrect_old_chain() {
    // After (a && b) is folded into an OR group, a further AND must nest
    // around the whole group instead of extending the old AND chain.
    let predicate = Predicate::build::<Kraken, _>(|q| {
        let a = q.number("age").equals(1);
        let b = q.number("age").equals(2);
        let c = q.number("age").equals(3);
        let d = q.number("age").equals(4);
        a.and(&b).or(&c).and(&d);
    });
    assert_eq!(
        predicate.expression(),
        "(((age == %@ && age == %@) || age == %@) && age == %@)"
    );
}

#[test]
fn test_combination_updates_both_operands() {
    // The operand not returned from the combinator carries the compound
    // form too, so chaining off either side renders the same expression.
    let predicate = Predicate::build::<Kraken, _>(|q| {
        let a = q.number("age").equals(1);
        let b = q.number("age").equals(2);
        let c = q.number("age").equals(3);
        a.and(&b);
        b.and(&c);
    });
    assert_eq!(predicate.expression(), "(age == %@ && age == %@ && age == %@)");
}

#[test]
fn test_negation() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.boolean("isAwesome").is_true().not();
    });
    assert_eq!(predicate.expression(), "!(isAwesome == true)");
}

#[test]
fn test_double_negation_does_not_cancel() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.boolean("isAwesome").is_true().not().not();
    });
    assert_eq!(predicate.expression(), "!(!(isAwesome == true))");
}

#[test]
fn test_negate_then_combine() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        let a = q.number("age").equals(1);
        let b = q.number("age").equals(2);
        let negated = a.and(&b).not();
        let c = q.number("age").equals(3);
        negated.and(&c);
    });
    assert_eq!(
        predicate.expression(),
        "(!((age == %@ && age == %@)) && age == %@)"
    );
}

#[test]
fn test_collection_is_empty() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.collection("friends").is_empty();
    });
    assert_eq!(predicate.expression(), "friends.@count == 0");
    assert!(predicate.arguments().is_empty());
}

#[test]
fn test_subquery_rendering() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.collection("friends").subquery::<Cerberus, _>(|friend| {
            let hungry = friend.boolean("isHungry").is_true();
            let awesome = friend.boolean("isAwesome").is_true();
            hungry.and(&awesome);
            SubqueryMatch::count(AggregateComparison::Equals, 0)
        });
    });
    assert_eq!(
        predicate.expression(),
        "SUBQUERY(friends, $CerberusItem, $CerberusItem.isHungry == true && \
         $CerberusItem.isAwesome == true).@count == 0"
    );
    assert!(predicate.arguments().is_empty());
}

#[test]
fn test_subquery_arguments_splice_into_parent() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        let young_friend = q.collection("friends").subquery::<Cerberus, _>(|friend| {
            friend.number("age").is_less_than(3);
            SubqueryMatch::any()
        });
        let old = q.number("age").is_greater_than(100);
        young_friend.and(&old);
    });
    assert_eq!(
        predicate.expression(),
        "(SUBQUERY(friends, $CerberusItem, $CerberusItem.age < %@).@count > 0 && age > %@)"
    );
    assert_eq!(
        predicate.arguments(),
        &[PredicateValue::Int(3), PredicateValue::Int(100)]
    );
}

#[test]
fn test_nested_subquery_aliases_disambiguate() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.collection("friends").subquery::<Cerberus, _>(|friend| {
            friend
                .collection("subordinates")
                .subquery::<Cerberus, _>(|subordinate| {
                    subordinate.boolean("isHungry").is_true();
                    SubqueryMatch::any()
                });
            SubqueryMatch::any()
        });
    });
    assert_eq!(
        predicate.expression(),
        "SUBQUERY(friends, $CerberusItem, SUBQUERY($CerberusItem.subordinates, \
         $CerberusItem2, $CerberusItem2.isHungry == true).@count > 0).@count > 0"
    );
}

#[test]
fn test_sibling_subqueries_keep_base_alias() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        let first = q.collection("friends").subquery::<Cerberus, _>(|friend| {
            friend.boolean("isHungry").is_true();
            SubqueryMatch::any()
        });
        let second = q.collection("friends").subquery::<Cerberus, _>(|friend| {
            friend.boolean("isAwesome").is_true();
            SubqueryMatch::any()
        });
        first.and(&second);
    });
    assert_eq!(
        predicate.expression(),
        "(SUBQUERY(friends, $CerberusItem, $CerberusItem.isHungry == true).@count > 0 && \
         SUBQUERY(friends, $CerberusItem, $CerberusItem.isAwesome == true).@count > 0)"
    );
}

#[test]
fn test_empty_subquery_compiles_to_always_false() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.collection("friends")
            .subquery::<Cerberus, _>(|_| SubqueryMatch::any());
    });
    assert_eq!(predicate.expression(), "FALSEPREDICATE");
}

#[test]
fn test_subquery_aggregates() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.collection("friends").subquery::<Cerberus, _>(|friend| {
            friend.boolean("isHungry").is_true();
            SubqueryMatch::min(AggregateComparison::GreaterThanOrEqualTo, 2)
        });
    });
    assert_eq!(
        predicate.expression(),
        "SUBQUERY(friends, $CerberusItem, $CerberusItem.isHungry == true).@min >= 2"
    );
}

#[test]
fn test_member_paths() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.member::<Cerberus>("bestFriend")
            .string("title")
            .equals("Hades", StringOptions::NONE);
    });
    assert_eq!(predicate.expression(), r#"bestFriend.title == "Hades""#);

    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.member::<Cerberus>("bestFriend").equals_nil();
    });
    assert_eq!(predicate.expression(), "bestFriend == nil");

    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.member::<Cerberus>("bestFriend")
            .equals(serde_json::json!({"id": 7}));
    });
    assert_eq!(predicate.expression(), "bestFriend == %@");
    assert_eq!(predicate.arguments().len(), 1);
}

#[test]
fn test_member_chains_compose() {
    struct Underworld;
    predikit::reflectable!(Underworld { ruler });

    let predicate = Predicate::build::<Underworld, _>(|q| {
        q.member::<Cerberus>("ruler")
            .member::<Kraken>("bestFriend")
            .number("age")
            .is_greater_than(9000);
    });
    assert_eq!(predicate.expression(), "ruler.bestFriend.age > %@");
}

#[test]
fn test_member_queries_combine_with_root_scope() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        let friend_hungry = q.member::<Cerberus>("bestFriend").boolean("isHungry").is_true();
        let old = q.number("age").is_greater_than(100);
        friend_hungry.and(&old);
    });
    assert_eq!(
        predicate.expression(),
        "(bestFriend.isHungry == true && age > %@)"
    );
}

#[test]
fn test_this_renders_self_at_root() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.this().equals_nil();
    });
    assert_eq!(predicate.expression(), "SELF == nil");
}

#[test]
fn test_this_renders_alias_in_subquery() {
    let predicate = Predicate::build::<Elf, _>(|q| {
        q.collection("enemies").subquery::<Kraken, _>(|enemy| {
            enemy.this().matches_any_value_in(vec!["Kraken", "Hydra"]);
            SubqueryMatch::any()
        });
    });
    assert_eq!(
        predicate.expression(),
        "SUBQUERY(enemies, $KrakenItem, $KrakenItem IN %@).@count > 0"
    );
}

#[test]
fn test_unknown_property_compiles_through() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.string("tittle").equals("typo", StringOptions::NONE);
    });
    assert_eq!(predicate.expression(), r#"tittle == "typo""#);
}

#[test]
fn test_any_entity_skips_validation() {
    let predicate = Predicate::build::<AnyEntity, _>(|q| {
        q.string("anything").equals("goes", StringOptions::NONE);
    });
    assert_eq!(predicate.expression(), r#"anything == "goes""#);
}

#[test]
fn test_cross_scope_combination_errors() {
    let mut saved = None;
    let _ = Predicate::build::<Kraken, _>(|q| {
        saved = Some(q.number("age").equals(1));
    });
    let first = saved.unwrap();

    let mut outcome = None;
    let _ = Predicate::build::<Kraken, _>(|q| {
        let second = q.number("age").equals(2);
        outcome = Some(second.try_and(&first));
    });

    match outcome.unwrap() {
        Err(PredicateError::ScopeMismatch { lhs, rhs }) => assert_ne!(lhs, rhs),
        other => panic!("expected scope mismatch, got {other:?}"),
    }
}

#[test]
fn test_subquery_scope_is_isolated_from_parent() {
    // A subquery over the root entity's own type produces predicates with
    // the same type parameter as the root scope; only the runtime scope
    // check keeps them from merging.
    let mut outcome = None;
    let _ = Predicate::build::<Kraken, _>(|q| {
        let outer = q.number("age").equals(1);
        q.collection("friends").subquery::<Kraken, _>(|friend| {
            let inner = friend.boolean("isAwesome").is_true();
            outcome = Some(inner.try_or(&outer));
            SubqueryMatch::any()
        });
    });
    assert!(matches!(
        outcome.unwrap(),
        Err(PredicateError::ScopeMismatch { .. })
    ));
}

#[test]
#[should_panic(expected = "different compile scopes")]
fn test_cross_scope_and_panics() {
    let mut saved = None;
    let _ = Predicate::build::<Kraken, _>(|q| {
        saved = Some(q.number("age").equals(1));
    });
    let first = saved.unwrap();

    let _ = Predicate::build::<Kraken, _>(|q| {
        let second = q.number("age").equals(2);
        second.and(&first);
    });
}

#[test]
fn test_no_cross_compile_leakage() {
    let _ = Predicate::build::<Kraken, _>(|q| {
        q.number("age").equals(42);
    });
    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.string("title").equals_nil();
    });
    assert_eq!(predicate.expression(), "title == nil");
    assert!(predicate.arguments().is_empty());
}

#[test]
fn test_harvest_is_idempotent() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        let a = q.number("age").equals(1);
        let b = q.boolean("isAwesome").is_true();
        a.and(&b);
    });
    assert_eq!(predicate.expression(), predicate.expression());
    assert_eq!(predicate.arguments(), predicate.arguments());

    let (expression, arguments) = predicate.clone().into_parts();
    assert_eq!(expression, predicate.expression());
    assert_eq!(arguments, predicate.arguments());
}

#[test]
fn test_shared_field_cache_reflects_once() {
    let cache = Arc::new(FieldCache::new());

    let first = Predicate::build_with_cache::<Kraken, _>(&cache, |q| {
        q.number("age").equals(1);
    });
    let second = Predicate::build_with_cache::<Kraken, _>(&cache, |q| {
        q.number("age").equals(1);
    });

    assert_eq!(first, second);
    assert_eq!(cache.entity_count(), 1);
}

#[test]
fn test_predicate_serializes() {
    let predicate = Predicate::build::<Kraken, _>(|q| {
        q.number("age").is_greater_than(5);
    });
    let json = serde_json::to_string(&predicate).unwrap();
    assert!(json.contains("age > %@"));
    let back: Predicate = serde_json::from_str(&json).unwrap();
    assert_eq!(back.expression(), predicate.expression());
}
