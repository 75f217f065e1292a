//! End-to-end pipeline tests over synthetic attempt-review documents.
//!
//! Each scenario feeds plain page lines into [`ExamPipeline::process`] and
//! asserts the assembled document: question kinds, extracted content,
//! grading, page provenance, and the issues recorded along the way.

use exam_oxide::model::{GradingStatus, QuestionContent};
use exam_oxide::{ExamPipeline, IssueCode, PageText, QuestionKind};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn page(lines: &[&str]) -> PageText {
    PageText::from_lines(lines.iter().map(|l| l.to_string()).collect::<Vec<_>>())
}

#[test]
fn test_single_choice_question_end_to_end() {
    init_logs();
    let pages = vec![page(&[
        "Pregunta 1",
        "Correcta",
        "Se puntúa 2,00 sobre 2,00",
        "¿Cuál de las siguientes proposiciones es una tautología?",
        "Seleccione una:",
        "a. p ∧ ¬p",
        "b. p ∨ ¬p ☑",
        "c. p",
        "La respuesta correcta es: b",
        "¡Correcto! Bien razonado.",
    ])];

    let doc = ExamPipeline::new().process("intento.pdf", &pages, None);
    assert_eq!(doc.questions.len(), 1);

    let q = &doc.questions[0];
    assert_eq!(q.id, "Q1");
    assert_eq!(q.number, 1);
    assert_eq!(q.kind, QuestionKind::SingleChoice);
    assert_eq!(
        q.stem.text,
        "¿Cuál de las siguientes proposiciones es una tautología?"
    );

    match &q.content {
        QuestionContent::SingleChoice {
            options,
            correct,
            user,
        } => {
            assert_eq!(options.len(), 3);
            assert_eq!(options[1].text, "p ∨ ¬p");
            assert_eq!(correct, &vec!["b".to_string()]);
            assert_eq!(user, &vec!["b".to_string()]);
        }
        other => panic!("wrong content variant: {:?}", other),
    }

    let grading = q.grading.as_ref().unwrap();
    assert_eq!(grading.status, Some(GradingStatus::Correct));
    assert_eq!(grading.score_awarded, Some(2.0));
    assert_eq!(grading.score_max, Some(2.0));
    assert_eq!(grading.feedback.as_deref(), Some("¡Correcto! Bien razonado."));

    // Logic symbols in the options make the text risky.
    assert!(q.flags.math_or_symbols_risky);
    assert!(q.flags.asset_required);
}

#[test]
fn test_matching_question_pairs() {
    let pages = vec![page(&[
        "Pregunta 2",
        "Parcialmente correcta",
        "Se puntúa 1,00 sobre 2,00",
        "Asocia las siguientes palabras con su clase.",
        "perro",
        "mamífero ☑",
        "gallina",
        "ave ☑",
        "trucha",
        "mamífero ☑",
        "La respuesta correcta es: perro → mamífero, gallina → ave, trucha → pez",
    ])];

    let doc = ExamPipeline::new().process("intento.pdf", &pages, None);
    let q = &doc.questions[0];
    assert_eq!(q.kind, QuestionKind::Matching);

    match &q.content {
        QuestionContent::Matching {
            pairs_correct,
            pairs_user,
            domain_hint,
        } => {
            assert_eq!(pairs_correct.len(), 3);
            assert_eq!(pairs_correct[2].left, "trucha");
            assert_eq!(pairs_correct[2].right, "pez");
            assert_eq!(pairs_user.len(), 3);
            assert_eq!(domain_hint.as_deref(), Some("palabras"));
        }
        other => panic!("wrong content variant: {:?}", other),
    }

    assert!(q
        .issues
        .iter()
        .any(|i| i.code == IssueCode::PartialScoringDetected));
}

#[test]
fn test_numeric_question_with_comma_separator() {
    let pages = vec![page(&[
        "Pregunta 3",
        "Correcta",
        "Se puntúa 1,00 sobre 1,00",
        "Calcula la entropía y redondea a 2 decimales.",
        "Respuesta: 3,5 ☑",
        "La respuesta correcta es: 3,5",
    ])];

    let doc = ExamPipeline::new().process("intento.pdf", &pages, None);
    let q = &doc.questions[0];
    assert_eq!(q.kind, QuestionKind::Numeric);

    match &q.content {
        QuestionContent::Numeric {
            expected,
            user,
            numeric_format,
        } => {
            assert_eq!(*expected, Some(3.5));
            assert_eq!(*user, Some(3.5));
            assert_eq!(numeric_format.decimal_separator, ",");
            assert_eq!(numeric_format.round_decimals, Some(2));
        }
        other => panic!("wrong content variant: {:?}", other),
    }
}

#[test]
fn test_single_item_multipart_downgraded() {
    let pages = vec![page(&[
        "Pregunta 4",
        "Incorrecta",
        "Se puntúa 0,00 sobre 2,00",
        "Seleccione una o más de una:",
        "a. única opción ☑",
        "Las respuestas correctas son: a",
    ])];

    let doc = ExamPipeline::new().process("intento.pdf", &pages, None);
    let q = &doc.questions[0];

    // A multi-select with one option cannot honor the schema; the
    // conformance corrector downgrades it and records the conversion.
    assert_eq!(q.kind, QuestionKind::ShortAnswerText);
    assert!(q.issues.iter().any(|i| i.code == IssueCode::KindDowngraded));
    match &q.content {
        QuestionContent::ShortAnswerText { expected, .. } => {
            assert_eq!(expected, &vec!["única opción".to_string()]);
        }
        other => panic!("wrong content variant: {:?}", other),
    }
}

#[test]
fn test_multi_key_disclosure_on_single_choice_corrected_with_issue() {
    let pages = vec![page(&[
        "Pregunta 1",
        "Correcta",
        "Se puntúa 1,00 sobre 1,00",
        "Elige la respuesta.",
        "Seleccione una:",
        "a. x ☑",
        "b. y",
        "La respuesta correcta es: a, b",
    ])];

    let doc = ExamPipeline::new().process("intento.pdf", &pages, None);
    let q = &doc.questions[0];

    // The schema allows at most one correct key on a single choice; the
    // extra key is dropped by the conformance pass and the correction is
    // recorded — never silently.
    match &q.content {
        QuestionContent::SingleChoice { correct, .. } => {
            assert_eq!(correct, &vec!["a".to_string()]);
        }
        other => panic!("wrong content variant: {:?}", other),
    }
    assert!(q
        .issues
        .iter()
        .any(|i| i.code == IssueCode::IndexRemapped && i.where_ == "Q1"));
}

#[test]
fn test_external_media_reference() {
    let pages = vec![page(&[
        "Pregunta 5",
        "Correcta",
        "Se puntúa 1,00 sobre 1,00",
        "Según el vídeo de la unidad 3, ¿qué algoritmo se presenta?",
        "Respuesta: minimax ☑",
        "La respuesta correcta es: minimax",
    ])];

    let doc = ExamPipeline::new().process("intento.pdf", &pages, None);
    let q = &doc.questions[0];
    assert_eq!(q.kind, QuestionKind::ExternalMediaReference);
    assert!(q.flags.requires_external_media);
    assert!(q
        .issues
        .iter()
        .any(|i| i.code == IssueCode::ExternalMediaRequired));
    match &q.content {
        QuestionContent::ExternalMediaReference { reference_text } => {
            assert!(reference_text.contains("vídeo de la unidad 3"));
        }
        other => panic!("wrong content variant: {:?}", other),
    }
}

#[test]
fn test_playback_reference_gets_kind_and_flag_together() {
    let pages = vec![page(&[
        "Pregunta 6",
        "Correcta",
        "Se puntúa 1,00 sobre 1,00",
        "Reproduce el archivo adjunto y contesta a la pregunta.",
        "Respuesta: fonema ☑",
        "La respuesta correcta es: fonema",
    ])];

    let doc = ExamPipeline::new().process("intento.pdf", &pages, None);
    let q = &doc.questions[0];
    // Kind and flag come from one shared cue vocabulary; they can never
    // disagree on the same block.
    assert_eq!(q.kind, QuestionKind::ExternalMediaReference);
    assert!(q.flags.requires_external_media);
    assert!(q
        .issues
        .iter()
        .any(|i| i.code == IssueCode::ExternalMediaRequired));
}

#[test]
fn test_multi_page_question_provenance() {
    let pages = vec![
        page(&[
            "Pregunta 1",
            "Correcta",
            "Se puntúa 1,00 sobre 1,00",
            "¿Capital de Francia?",
            "Seleccione una:",
            "a. Lyon",
        ]),
        page(&["b. París ☑", "La respuesta correcta es: b"]),
    ];

    let doc = ExamPipeline::new().process("intento.pdf", &pages, None);
    let q = &doc.questions[0];
    assert_eq!(q.raw.pages, vec![0, 1]);
    match &q.content {
        QuestionContent::SingleChoice { options, .. } => assert_eq!(options.len(), 2),
        other => panic!("wrong content variant: {:?}", other),
    }
}

#[test]
fn test_missing_heading_reanchored_by_score_line() {
    init_logs();
    // The second question's "Pregunta 2" heading was lost in extraction;
    // its score line re-anchors a new block with an inferred number.
    let pages = vec![page(&[
        "Pregunta 1",
        "Correcta",
        "Se puntúa 1,00 sobre 1,00",
        "Primera pregunta",
        "Respuesta: alfa ☑",
        "La respuesta correcta es: alfa",
        "Se puntúa 0,00 sobre 1,00",
        "Segunda pregunta",
        "Respuesta: beta ☑",
        "La respuesta correcta es: gamma",
    ])];

    let doc = ExamPipeline::new().process("intento.pdf", &pages, None);
    assert_eq!(doc.questions.len(), 2);
    assert_eq!(doc.questions[0].number, 1);
    assert_eq!(doc.questions[1].number, 2);
    assert!(doc.questions[1]
        .issues
        .iter()
        .any(|i| i.code == IssueCode::IndexRemapped));
}

#[test]
fn test_missing_headings_reanchored_by_selection_cues() {
    init_logs();
    // Both headings and both score lines were lost in extraction; the
    // repeated once-per-question selection cue is the remaining boundary
    // signal and must yield two questions, not one merged block.
    let pages = vec![page(&[
        "Primera pregunta",
        "Seleccione una:",
        "a. alfa ☑",
        "b. beta",
        "La respuesta correcta es: a",
        "Segunda pregunta",
        "Seleccione una:",
        "a. gamma",
        "b. delta ☑",
        "La respuesta correcta es: b",
    ])];

    let doc = ExamPipeline::new().process("intento.pdf", &pages, None);
    assert_eq!(doc.questions.len(), 2);
    assert_eq!(doc.questions[0].number, 1);
    assert_eq!(doc.questions[1].number, 2);
    for q in &doc.questions {
        assert_eq!(q.kind, QuestionKind::SingleChoice);
        assert!(q.issues.iter().any(|i| i.code == IssueCode::IndexRemapped));
    }
    match &doc.questions[1].content {
        QuestionContent::SingleChoice { correct, user, .. } => {
            assert_eq!(correct, &vec!["b".to_string()]);
            assert_eq!(user, &vec!["b".to_string()]);
        }
        other => panic!("wrong content variant: {:?}", other),
    }
}

#[test]
fn test_raw_block_text_preserves_everything() {
    let lines = [
        "Pregunta 1",
        "Correcta",
        "Se puntúa 1,00 sobre 1,00",
        "Texto con rareza §§ que ningún extractor entiende",
        "Respuesta: algo ☑",
        "La respuesta correcta es: algo",
    ];
    let pages = vec![page(&lines)];

    let doc = ExamPipeline::new().process("intento.pdf", &pages, None);
    let q = &doc.questions[0];
    // Every line after the heading survives verbatim in the raw block.
    for line in &lines[1..] {
        assert!(
            q.raw.block_text.contains(line),
            "raw block lost line: {}",
            line
        );
    }
}

#[test]
fn test_schema_invariants_hold_for_every_question() {
    let pages = vec![page(&[
        "Pregunta 1",
        "Seleccione una:",
        "a. x ☑",
        "b. y",
        "La respuesta correcta es: a",
        "Pregunta 2",
        "texto sin ninguna pista reconocible",
        "Pregunta 3",
        "Completa la tabla de verdad",
        "p | q",
        "V | F",
    ])];

    let doc = ExamPipeline::new().process("intento.pdf", &pages, None);
    assert_eq!(doc.schema_version, "1.0");
    assert_eq!(doc.source.doc_type, "moodle_attempt_review");
    assert!(!doc.questions.is_empty());

    for q in &doc.questions {
        assert!(!q.raw.pages.is_empty());
        assert!(!q.raw.block_text.is_empty());
        assert_eq!(q.id, format!("Q{}", q.number));
        // The serialized kind must come from the closed set.
        let kind_json = serde_json::to_value(q.kind).unwrap();
        let name = kind_json.as_str().unwrap();
        assert!([
            "single_choice",
            "multi_select",
            "matching",
            "short_answer_text",
            "numeric",
            "cloze_labeled_blanks",
            "cloze_table",
            "multipart_short_answer",
            "external_media_reference",
        ]
        .contains(&name));
    }

    // The cue-free block fell back with a recorded issue.
    assert!(doc.questions[1]
        .issues
        .iter()
        .any(|i| i.code == IssueCode::NoCorrectAnswerFound));
}

#[test]
fn test_repeated_runs_serialize_identically() {
    let pages = vec![page(&[
        "Pregunta 1",
        "Correcta",
        "Se puntúa 2,00 sobre 2,00",
        "Asocia las siguientes fórmulas con su categoría.",
        "p ∨ ¬p",
        "Tautología ☑",
        "La respuesta correcta es: p ∨ ¬p → Tautología, p ∧ ¬p → Contradicción",
    ])];

    let pipeline = ExamPipeline::new();
    let first = pipeline
        .process("intento.pdf", &pages, None)
        .to_json_string()
        .unwrap();
    let second = pipeline
        .process("intento.pdf", &pages, None)
        .to_json_string()
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_recurring_headers_stripped_before_segmentation() {
    let make_page = |n: u32| {
        page(&[
            "Examen final - Razonamiento",
            &format!("Pregunta {}", n),
            "Correcta",
            "Se puntúa 1,00 sobre 1,00",
            "Enunciado",
            &format!("Respuesta: valor{} ☑", n),
            &format!("La respuesta correcta es: valor{}", n),
            "Página X de 4",
        ])
    };
    // from_lines assigns positions by index, so the first and last lines sit
    // in the extremal bands on every page.
    let pages: Vec<PageText> = (1..=4).map(make_page).collect();

    let doc = ExamPipeline::new().process("intento.pdf", &pages, None);
    assert_eq!(doc.questions.len(), 4);
    for q in &doc.questions {
        assert!(!q.raw.block_text.contains("Examen final"));
        assert!(!q.raw.block_text.contains("Página X"));
    }
}
