use std::collections::HashSet;
use std::sync::Arc;

use super::*;
use crate::config::Config;
use crate::embedding::{MockEmbeddingClient, ParaphrasePair};
use crate::knowledge::{AnswerInfo, MockKnowledgeStore};
use crate::nlp::{DepRel, Document, DocumentBuilder, EntityLabel, MockParser, Pos};

const FRESNO_ANSWER: &str = "I grew up in Fresno with my mother.";

/// "I grew up in Fresno with my mother." with a standard dependency parse.
fn fresno_doc() -> Document {
    DocumentBuilder::new()
        .token("I", "I", Pos::Pron, DepRel::Nsubj, 1)
        .token("grew", "grow", Pos::Verb, DepRel::Root, 1)
        .token("up", "up", Pos::Adp, DepRel::Other, 1)
        .token("in", "in", Pos::Adp, DepRel::Other, 1)
        .token("Fresno", "Fresno", Pos::Propn, DepRel::Other, 3)
        .token("with", "with", Pos::Adp, DepRel::Other, 1)
        .token("my", "my", Pos::Det, DepRel::Other, 7)
        .token("mother", "mother", Pos::Noun, DepRel::Other, 5)
        .token(".", ".", Pos::Punct, DepRel::Other, 1)
        .sentence(0, 9)
        .entity(4, 5, EntityLabel::Gpe)
        .build()
}

/// "My mother." — no verb anywhere in the document.
fn verbless_mother_doc() -> Document {
    DocumentBuilder::new()
        .token("My", "my", Pos::Det, DepRel::Other, 1)
        .token("mother", "mother", Pos::Noun, DepRel::Root, 1)
        .token(".", ".", Pos::Punct, DepRel::Other, 1)
        .sentence(0, 3)
        .build()
}

fn answer(text: &str) -> AnswerInfo {
    AnswerInfo {
        question_text: String::new(),
        answer_text: text.to_string(),
    }
}

struct Fixture {
    generator: FollowupGenerator<MockKnowledgeStore, MockEmbeddingClient, MockParser>,
    embedding: Arc<MockEmbeddingClient>,
    parser: Arc<MockParser>,
}

fn fixture(semantic_dedup: bool, pop_culture: HashSet<String>) -> Fixture {
    let knowledge = Arc::new(MockKnowledgeStore::new());
    let embedding = Arc::new(MockEmbeddingClient::new());
    let parser = Arc::new(MockParser::new());
    let config = Config {
        semantic_dedup,
        ..Default::default()
    };
    let generator = FollowupGenerator::new(
        knowledge,
        Arc::clone(&embedding),
        Arc::clone(&parser),
        pop_culture,
        config,
    );
    Fixture {
        generator,
        embedding,
        parser,
    }
}

#[tokio::test]
async fn test_extracts_place_and_family() {
    let f = fixture(false, HashSet::new());
    f.parser.set_document(FRESNO_ANSWER, fresno_doc());

    let entities = extract_entities(f.parser.as_ref(), &[answer(FRESNO_ANSWER)], "Clint")
        .await
        .unwrap();

    assert_eq!(entities.places.len(), 1);
    assert!(entities.places.get("Fresno").is_some());
    assert_eq!(entities.family.len(), 1);
    assert!(entities.family.get("mother").is_some());
    assert!(entities.people.is_empty());
    assert_eq!(entities.corpus_text, FRESNO_ANSWER);
}

#[tokio::test]
async fn test_excluded_and_mentor_name_entities_skipped() {
    let text = "Carla Jones and I moved to America.";
    let doc = DocumentBuilder::new()
        .token("Carla", "Carla", Pos::Propn, DepRel::Nsubj, 4)
        .token("Jones", "Jones", Pos::Propn, DepRel::Other, 0)
        .token("and", "and", Pos::Other, DepRel::Other, 0)
        .token("I", "I", Pos::Pron, DepRel::Nsubj, 4)
        .token("moved", "move", Pos::Verb, DepRel::Root, 4)
        .token("to", "to", Pos::Adp, DepRel::Other, 4)
        .token("America", "America", Pos::Propn, DepRel::Other, 5)
        .token(".", ".", Pos::Punct, DepRel::Other, 4)
        .sentence(0, 8)
        .entity(0, 2, EntityLabel::Person)
        .entity(6, 7, EntityLabel::Gpe)
        .build();

    let f = fixture(false, HashSet::new());
    f.parser.set_document(text, doc);

    // "Carla Jones" is the mentor herself; "America" is on the fixed
    // exclusion list.
    let entities = extract_entities(f.parser.as_ref(), &[answer(text)], "Carla Jones")
        .await
        .unwrap();

    assert!(entities.people.is_empty());
    assert!(entities.places.is_empty());
}

#[tokio::test]
async fn test_last_mention_wins_per_entity_text() {
    let first = "My mother is kind.";
    let first_doc = DocumentBuilder::new()
        .token("My", "my", Pos::Det, DepRel::Other, 1)
        .token("mother", "mother", Pos::Noun, DepRel::Nsubj, 2)
        .token("is", "be", Pos::Verb, DepRel::Root, 2)
        .token("kind", "kind", Pos::Adj, DepRel::Other, 2)
        .token(".", ".", Pos::Punct, DepRel::Other, 2)
        .sentence(0, 5)
        .build();

    let f = fixture(false, HashSet::new());
    f.parser.set_document(first, first_doc);
    f.parser.set_document(FRESNO_ANSWER, fresno_doc());

    let entities = extract_entities(
        f.parser.as_ref(),
        &[answer(first), answer(FRESNO_ANSWER)],
        "Clint",
    )
    .await
    .unwrap();

    assert_eq!(entities.family.len(), 1);
    let mother = entities.family.get("mother").unwrap();
    // The second answer's mention replaced the first.
    assert_eq!(mother.doc.tokens.len(), 9);
}

#[tokio::test]
async fn test_fresno_mother_end_to_end() {
    let f = fixture(false, HashSet::new());
    f.parser.set_document(FRESNO_ANSWER, fresno_doc());
    f.embedding.set_similarity("Fresno", 0.7);
    f.embedding.set_similarity("mother", 0.6);

    let mut entities = extract_entities(f.parser.as_ref(), &[answer(FRESNO_ANSWER)], "Clint")
        .await
        .unwrap();
    let followups = f
        .generator
        .generate_questions(&mut entities, &[])
        .await
        .unwrap();

    assert_eq!(followups.len(), 2);

    assert_eq!(followups[0].question, "What was Fresno like?");
    assert_eq!(followups[0].entity, "Fresno");
    assert_eq!(followups[0].template, EntityCategory::Place);
    assert_eq!(followups[0].verb, "grew");
    assert!((followups[0].weight - 1.2).abs() < 1e-6);

    assert_eq!(followups[1].question, "Can you tell me more about your mother?");
    assert_eq!(followups[1].entity, "mother");
    assert_eq!(followups[1].template, EntityCategory::Family);
    assert_eq!(followups[1].verb, "grew");
    assert!((followups[1].weight - 1.1).abs() < 1e-6);
}

#[tokio::test]
async fn test_answered_entity_never_generates_followup() {
    let f = fixture(false, HashSet::new());
    f.parser.set_document(FRESNO_ANSWER, fresno_doc());
    f.embedding.set_similarity("Fresno", 0.7);
    f.embedding.set_similarity("mother", 0.6);

    let answered = vec![AnswerInfo {
        question_text: "What was Fresno like?".to_string(),
        answer_text: "Hot in the summer.".to_string(),
    }];

    let mut entities = extract_entities(f.parser.as_ref(), &[answer(FRESNO_ANSWER)], "Clint")
        .await
        .unwrap();
    let followups = f
        .generator
        .generate_questions(&mut entities, &answered)
        .await
        .unwrap();

    assert!(
        followups.iter().all(|q| q.entity != "Fresno"),
        "an already-answered entity must never reappear"
    );
    assert_eq!(followups.len(), 1);
    assert_eq!(followups[0].entity, "mother");
}

#[tokio::test]
async fn test_verbless_entity_ranks_below_everything() {
    let verbless = "My mother.";
    let f = fixture(false, HashSet::new());
    f.parser.set_document(FRESNO_ANSWER, fresno_doc());
    f.parser.set_document(verbless, verbless_mother_doc());
    f.embedding.set_similarity("Fresno", 0.1);
    f.embedding.set_similarity("mother", 0.9);

    // The later verbless mention of "mother" wins the family slot, so even
    // with the better similarity it must floor at -1.
    let mut entities = extract_entities(
        f.parser.as_ref(),
        &[answer(FRESNO_ANSWER), answer(verbless)],
        "Clint",
    )
    .await
    .unwrap();
    let followups = f
        .generator
        .generate_questions(&mut entities, &[])
        .await
        .unwrap();

    assert_eq!(followups.len(), 2);
    assert_eq!(followups[0].entity, "Fresno");
    assert_eq!(followups[1].entity, "mother");
    assert_eq!(followups[1].weight, NO_VERB_WEIGHT);
    assert!(followups[1].verb.is_empty());
}

#[tokio::test]
async fn test_similarity_failure_drops_only_that_entity() {
    let f = fixture(false, HashSet::new());
    f.parser.set_document(FRESNO_ANSWER, fresno_doc());
    f.embedding.fail_similarity("Fresno");
    f.embedding.set_similarity("mother", 0.6);

    let mut entities = extract_entities(f.parser.as_ref(), &[answer(FRESNO_ANSWER)], "Clint")
        .await
        .unwrap();
    let followups = f
        .generator
        .generate_questions(&mut entities, &[])
        .await
        .unwrap();

    assert_eq!(followups.len(), 1, "only the failed entity may be dropped");
    assert_eq!(followups[0].entity, "mother");
}

#[tokio::test]
async fn test_semantic_dedup_removes_paraphrase_of_answered_question() {
    let fishing = "I went fishing.";
    let fishing_doc = DocumentBuilder::new()
        .token("I", "I", Pos::Pron, DepRel::Nsubj, 1)
        .token("went", "go", Pos::Verb, DepRel::Root, 1)
        .token("fishing", "fishing", Pos::Noun, DepRel::Other, 1)
        .token(".", ".", Pos::Punct, DepRel::Other, 1)
        .sentence(0, 4)
        .entity(2, 3, EntityLabel::Loc)
        .build();

    let f = fixture(true, HashSet::new());
    f.parser.set_document(fishing, fishing_doc);
    f.embedding.set_similarity("fishing", 0.4);
    // questions = [answered..., followups...]; pair scores above 0.92 mark
    // "What was fishing like?" as a paraphrase of the answered question.
    f.embedding.set_paraphrase_pairs(vec![ParaphrasePair {
        score: 0.95,
        first: 0,
        second: 1,
    }]);

    let answered = vec![AnswerInfo {
        question_text: "What is your favorite hobby?".to_string(),
        answer_text: "Fishing mostly.".to_string(),
    }];

    let mut entities = extract_entities(f.parser.as_ref(), &[answer(fishing)], "Clint")
        .await
        .unwrap();
    let followups = f
        .generator
        .generate_questions(&mut entities, &answered)
        .await
        .unwrap();

    assert!(
        followups.is_empty(),
        "paraphrased follow-up must be removed, got {:?}",
        followups
    );
}

#[tokio::test]
async fn test_semantic_dedup_keeps_higher_weighted_followup() {
    let text = "I grew up in Fresno and I visited Boston.";
    let doc = DocumentBuilder::new()
        .token("I", "I", Pos::Pron, DepRel::Nsubj, 1)
        .token("grew", "grow", Pos::Verb, DepRel::Root, 1)
        .token("up", "up", Pos::Adp, DepRel::Other, 1)
        .token("in", "in", Pos::Adp, DepRel::Other, 1)
        .token("Fresno", "Fresno", Pos::Propn, DepRel::Other, 3)
        .token("and", "and", Pos::Other, DepRel::Other, 1)
        .token("I", "I", Pos::Pron, DepRel::Nsubj, 7)
        .token("visited", "visit", Pos::Verb, DepRel::Other, 1)
        .token("Boston", "Boston", Pos::Propn, DepRel::Other, 7)
        .token(".", ".", Pos::Punct, DepRel::Other, 1)
        .sentence(0, 10)
        .entity(4, 5, EntityLabel::Gpe)
        .entity(8, 9, EntityLabel::Gpe)
        .build();

    let f = fixture(true, HashSet::new());
    f.parser.set_document(text, doc);
    f.embedding.set_similarity("Fresno", 0.7);
    f.embedding.set_similarity("Boston", 0.1);
    // The two generated place questions paraphrase each other.
    f.embedding.set_paraphrase_pairs(vec![ParaphrasePair {
        score: 0.93,
        first: 0,
        second: 1,
    }]);

    let mut entities = extract_entities(f.parser.as_ref(), &[answer(text)], "Clint")
        .await
        .unwrap();
    let followups = f
        .generator
        .generate_questions(&mut entities, &[])
        .await
        .unwrap();

    assert_eq!(followups.len(), 1);
    assert_eq!(
        followups[0].entity, "Fresno",
        "the higher-weighted side must survive"
    );
}

#[tokio::test]
async fn test_pop_culture_penalty() {
    let text = "I love Batman.";
    let doc = DocumentBuilder::new()
        .token("I", "I", Pos::Pron, DepRel::Nsubj, 1)
        .token("love", "love", Pos::Verb, DepRel::Root, 1)
        .token("Batman", "Batman", Pos::Propn, DepRel::Other, 1)
        .token(".", ".", Pos::Punct, DepRel::Other, 1)
        .sentence(0, 4)
        .entity(2, 3, EntityLabel::Person)
        .build();

    let pop_culture: HashSet<String> = ["Batman".to_string()].into_iter().collect();
    let f = fixture(false, pop_culture);
    f.parser.set_document(text, doc);
    f.embedding.set_similarity("Batman", 0.8);

    let mut entities = extract_entities(f.parser.as_ref(), &[answer(text)], "Clint")
        .await
        .unwrap();
    let followups = f
        .generator
        .generate_questions(&mut entities, &[])
        .await
        .unwrap();

    assert_eq!(followups.len(), 1);
    // -(1 - 0.8) for the pop-culture hit, +0.5 subject bonus, +0.8 similarity.
    assert!((followups[0].weight - 1.1).abs() < 1e-6);
}

#[tokio::test]
async fn test_followup_ties_keep_insertion_order() {
    let f = fixture(false, HashSet::new());
    f.parser.set_document(FRESNO_ANSWER, fresno_doc());
    // Equal similarity puts both entities at the same final weight.
    f.embedding.set_similarity("Fresno", 0.5);
    f.embedding.set_similarity("mother", 0.5);

    let mut entities = extract_entities(f.parser.as_ref(), &[answer(FRESNO_ANSWER)], "Clint")
        .await
        .unwrap();
    let followups = f
        .generator
        .generate_questions(&mut entities, &[])
        .await
        .unwrap();

    assert_eq!(followups.len(), 2);
    // Family templates are inserted before place templates.
    assert_eq!(followups[0].template, EntityCategory::Family);
    assert_eq!(followups[1].template, EntityCategory::Place);
}
