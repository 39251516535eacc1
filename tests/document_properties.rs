//! Property tests for edit isolation on documents and example sets.
//!
//! For all valid edits, exactly the targeted field or record changes
//! and everything else stays byte-identical.

use proptest::prelude::*;

use policy_forge::domain::example::{ExampleLabel, ExampleSet, GeneratedExample};
use policy_forge::domain::policy::{FieldKey, PolicyDocument, PolicyVariant};

fn full_machine_document() -> PolicyDocument {
    PolicyDocument::new(PolicyVariant::Machine, "Spam Policy")
        .unwrap()
        .with_field(FieldKey::Description, "Detects spam.")
        .unwrap()
        .with_field(FieldKey::Scope, "All text surfaces.")
        .unwrap()
        .with_field(FieldKey::ViolationCriteria, vec!["links", "scams", "bots"])
        .unwrap()
        .with_field(FieldKey::NonViolationExamples, vec!["promo by partner"])
        .unwrap()
        .with_field(FieldKey::EdgeCaseGuidance, vec!["ambiguous referral codes"])
        .unwrap()
}

fn label_strategy() -> impl Strategy<Value = ExampleLabel> {
    prop_oneof![
        Just(ExampleLabel::Violation),
        Just(ExampleLabel::Borderline),
        Just(ExampleLabel::NonViolation),
    ]
}

proptest! {
    #[test]
    fn prose_update_touches_only_the_target(text in ".{0,80}") {
        let doc = full_machine_document();
        let updated = doc.update_field(FieldKey::Description, text.clone()).unwrap();

        prop_assert_eq!(
            updated.field(FieldKey::Description).unwrap().as_prose(),
            Some(text.as_str())
        );
        for key in PolicyVariant::Machine.field_order() {
            if *key != FieldKey::Description {
                prop_assert_eq!(updated.field(*key), doc.field(*key));
            }
        }
        prop_assert_eq!(updated.name(), doc.name());
    }

    #[test]
    fn item_replacement_touches_only_the_target(index in 0usize..3, text in ".{0,40}") {
        let doc = full_machine_document();
        let updated = doc.replace_item(FieldKey::ViolationCriteria, index, text.clone()).unwrap();

        let before = doc.field(FieldKey::ViolationCriteria).unwrap().as_items().unwrap();
        let after = updated.field(FieldKey::ViolationCriteria).unwrap().as_items().unwrap();
        prop_assert_eq!(after.len(), before.len());
        for i in 0..before.len() {
            if i == index {
                prop_assert_eq!(&after[i], &text);
            } else {
                prop_assert_eq!(&after[i], &before[i]);
            }
        }
        for key in PolicyVariant::Machine.field_order() {
            if *key != FieldKey::ViolationCriteria {
                prop_assert_eq!(updated.field(*key), doc.field(*key));
            }
        }
    }

    #[test]
    fn lists_never_shrink_below_one_item(removals in 0usize..6) {
        let mut doc = full_machine_document();
        for _ in 0..removals {
            match doc.remove_item(FieldKey::ViolationCriteria, 0) {
                Ok(next) => doc = next,
                Err(_) => break,
            }
        }
        let remaining = doc
            .field(FieldKey::ViolationCriteria)
            .unwrap()
            .as_items()
            .unwrap()
            .len();
        prop_assert!(remaining >= 1);
    }

    #[test]
    fn relabel_touches_only_the_target(
        index in 0usize..4,
        label in label_strategy(),
    ) {
        let set = ExampleSet::from_generated(
            (0..4)
                .map(|i| GeneratedExample {
                    text: format!("example {}", i),
                    label: None,
                })
                .collect(),
        );
        let relabeled = set.relabel(index, label).unwrap();

        for (i, (before, after)) in set
            .records()
            .iter()
            .zip(relabeled.records().iter())
            .enumerate()
        {
            prop_assert_eq!(before.text(), after.text());
            if i == index {
                prop_assert_eq!(after.label(), label);
            } else {
                prop_assert_eq!(after.label(), before.label());
            }
        }
    }
}
