//! Sample documents shared by unit tests.

use crate::document::MrsDocument;
use crate::mrs::Mrs;
use serde_json::{Value, json};

fn document(value: Value) -> MrsDocument {
    serde_json::from_value(value).unwrap()
}

fn load(doc: &MrsDocument) -> Mrs {
    Mrs::from_document(doc).unwrap()
}

fn x(name: &str) -> Value {
    json!({ "var": name, "extras": { "PERS": "3", "NUM": "SG", "IND": "+" } })
}

fn pair(feature: &str, value: Value) -> Value {
    let mut value = value;
    value["feature"] = json!(feature);
    value
}

fn ep(pred: &str, label: &str, span: (usize, usize), pairs: Vec<Value>) -> Value {
    json!({ "pred": pred, "label": label, "cfrom": span.0, "cto": span.1, "fvpairs": pairs })
}

/// "the girl Anna likes the dog Bart."
///
/// ```text
/// #0 APPOS_REL     #1 _THE_Q_REL  #2 _girl_n_1_rel  #3 PROPER_Q_REL  #4 NAMED_REL(Anna)
/// #5 _like_v_1_rel #6 APPOS_REL   #7 _THE_Q_REL     #8 _dog_n_1_rel  #9 PROPER_Q_REL  #10 NAMED_REL(Bart)
/// ```
pub(crate) fn appos_document() -> MrsDocument {
    let untensed = json!({ "SF": "PROP", "TENSE": "UNTENSED", "MOOD": "INDICATIVE" });
    document(json!({
        "ltop": "h1",
        "index": "e2",
        "eps": [
            ep("APPOS_REL", "h3", (0, 13), vec![
                pair("ARG0", json!({ "var": "e4", "extras": untensed })),
                pair("ARG1", x("x5")),
                pair("ARG2", x("x6")),
            ]),
            ep("_THE_Q_REL", "h7", (0, 3), vec![
                pair("ARG0", x("x5")),
                pair("RSTR", json!({ "var": "h9" })),
                pair("BODY", json!({ "var": "h8" })),
            ]),
            ep("_girl_n_1_rel", "h10", (4, 8), vec![pair("ARG0", x("x5"))]),
            ep("PROPER_Q_REL", "h11", (9, 13), vec![
                pair("ARG0", x("x6")),
                pair("RSTR", json!({ "var": "h12" })),
                pair("BODY", json!({ "var": "h13" })),
            ]),
            ep("NAMED_REL", "h14", (9, 13), vec![pair("ARG0", x("x6")), pair("CARG", json!({ "constant": "Anna" }))]),
            ep("_like_v_1_rel", "h3", (14, 19), vec![
                pair("ARG0", json!({ "var": "e2", "extras": { "SF": "PROP", "TENSE": "PRES" } })),
                pair("ARG1", x("x5")),
                pair("ARG2", x("x15")),
            ]),
            ep("APPOS_REL", "h3", (20, 34), vec![
                pair("ARG0", json!({ "var": "e17", "extras": untensed })),
                pair("ARG1", x("x15")),
                pair("ARG2", x("x16")),
            ]),
            ep("_THE_Q_REL", "h18", (20, 23), vec![
                pair("ARG0", x("x15")),
                pair("RSTR", json!({ "var": "h20" })),
                pair("BODY", json!({ "var": "h19" })),
            ]),
            ep("_dog_n_1_rel", "h21", (24, 27), vec![pair("ARG0", x("x15"))]),
            ep("PROPER_Q_REL", "h22", (28, 34), vec![
                pair("ARG0", x("x16")),
                pair("RSTR", json!({ "var": "h23" })),
                pair("BODY", json!({ "var": "h24" })),
            ]),
            ep("NAMED_REL", "h25", (28, 34), vec![pair("ARG0", x("x16")), pair("CARG", json!({ "constant": "Bart" }))]),
        ],
        "hcons": [
            { "hi": "h9", "rel": "qeq", "lo": "h10" },
            { "hi": "h12", "rel": "qeq", "lo": "h14" },
            { "hi": "h20", "rel": "qeq", "lo": "h21" },
            { "hi": "h23", "rel": "qeq", "lo": "h25" },
        ],
    }))
}

pub(crate) fn appos() -> Mrs {
    load(&appos_document())
}

/// "The dog that barked chased the cat."
///
/// `_bark_v_1_rel` shares the noun's label `h7`, so its ARG1 edge is `/EQ`.
pub(crate) fn relative_clause_document() -> MrsDocument {
    let past = json!({ "SF": "PROP", "TENSE": "PAST" });
    document(json!({
        "ltop": "h1",
        "index": "e2",
        "eps": [
            ep("_THE_Q_REL", "h3", (0, 3), vec![
                pair("ARG0", x("x5")),
                pair("RSTR", json!({ "var": "h6" })),
                pair("BODY", json!({ "var": "h4" })),
            ]),
            ep("_dog_n_1_rel", "h7", (4, 7), vec![pair("ARG0", x("x5"))]),
            ep("_bark_v_1_rel", "h7", (13, 20), vec![
                pair("ARG0", json!({ "var": "e8", "extras": past })),
                pair("ARG1", x("x5")),
            ]),
            ep("_chase_v_1_rel", "h9", (21, 27), vec![
                pair("ARG0", json!({ "var": "e2", "extras": past })),
                pair("ARG1", x("x5")),
                pair("ARG2", x("x10")),
            ]),
            ep("_THE_Q_REL", "h11", (28, 31), vec![
                pair("ARG0", x("x10")),
                pair("RSTR", json!({ "var": "h13" })),
                pair("BODY", json!({ "var": "h12" })),
            ]),
            ep("_cat_n_1_rel", "h14", (32, 36), vec![pair("ARG0", x("x10"))]),
        ],
        "hcons": [
            { "hi": "h6", "rel": "qeq", "lo": "h7" },
            { "hi": "h13", "rel": "qeq", "lo": "h14" },
        ],
    }))
}

pub(crate) fn relative_clause() -> Mrs {
    load(&relative_clause_document())
}

/// A quantifier and its noun: `#0 _a_q_rel RSTR h4 qeq h5`, `#1 _dog_n_1_rel` labelled `h5`.
pub(crate) fn quantified_noun() -> Mrs {
    load(&document(json!({
        "ltop": "h1",
        "eps": [
            ep("_a_q_rel", "h3", (0, 1), vec![
                pair("ARG0", x("x2")),
                pair("RSTR", json!({ "var": "h4" })),
                pair("BODY", json!({ "var": "h6" })),
            ]),
            ep("_dog_n_1_rel", "h5", (2, 5), vec![pair("ARG0", x("x2"))]),
        ],
        "hcons": [ { "hi": "h4", "rel": "qeq", "lo": "h5" } ],
    })))
}

/// `#0 _dog_n_1_rel` (label `h5`) and `#1 _bark_v_1_rel` (label `verb_label`) whose ARG1 is the dog.
///
/// `h5` makes the argument edge `/EQ`, anything else `/NEQ`.
pub(crate) fn verb_and_noun(verb_label: &str) -> Mrs {
    load(&document(json!({
        "ltop": "h1",
        "index": "e3",
        "eps": [
            ep("_dog_n_1_rel", "h5", (0, 3), vec![pair("ARG0", x("x2"))]),
            ep("_bark_v_1_rel", verb_label, (4, 9), vec![pair("ARG0", json!({ "var": "e3" })), pair("ARG1", x("x2"))]),
        ],
    })))
}
