#![cfg(feature = "serde")]

use std::time::Duration;

use genmoea::{
    encoding::{Encoding, Field},
    evolution::{EvolutionOptions, LogLevel, Template},
    operators::OperatorSet,
    selection::Selection,
};

#[test]
fn test_options_round_trip() {
    let options = EvolutionOptions::builder()
        .max_generations(250)
        .max_evaluations(10_000)
        .max_time(Duration::from_secs(30))
        .log_level(LogLevel::Minimal)
        .build();
    let json = serde_json::to_string(&options).unwrap();
    let restored: EvolutionOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, options);
}

#[test]
fn test_template_and_operators_serialize() {
    let json = serde_json::to_string(&Template::ALL).unwrap();
    let restored: Vec<Template> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, Template::ALL.to_vec());

    let operators = OperatorSet::defaults_for(Selection::Tournament(3), Encoding::BinaryGray).unwrap();
    let restored: OperatorSet =
        serde_json::from_str(&serde_json::to_string(&operators).unwrap()).unwrap();
    assert_eq!(restored, operators);
}

#[test]
fn test_field_serializes() {
    let field = Field::real_integer(vec![0.0, 1.0], vec![5.0, 9.0], vec![false, true]).unwrap();
    let restored: Field = serde_json::from_str(&serde_json::to_string(&field).unwrap()).unwrap();
    assert_eq!(restored, field);
}
