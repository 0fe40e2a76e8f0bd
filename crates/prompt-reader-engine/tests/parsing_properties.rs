use prompt_reader_engine::parsing::{Block, PromptId, parse_prompts, prompts};
use prompt_reader_engine::{append_prompt, normalize_prompt_body};
use pretty_assertions::assert_eq;

const FRAGMENTS: &[&str] = &[
    "- item",
    "-",
    "  - indented",
    "continued",
    "  spaced",
    "",
    "   ",
    "# Heading",
    "**bold** `code`",
];

/// Every document of up to `max_lines` lines built from [`FRAGMENTS`].
fn documents(max_lines: usize) -> Vec<String> {
    let mut docs = vec![String::new()];
    let mut frontier = vec![Vec::<&str>::new()];
    for _ in 0..max_lines {
        let mut next = Vec::new();
        for lines in &frontier {
            for fragment in FRAGMENTS {
                let mut extended = lines.clone();
                extended.push(fragment);
                docs.push(extended.join("\n"));
                docs.push(format!("{}\n", extended.join("\n")));
                next.push(extended);
            }
        }
        frontier = next;
    }
    docs
}

fn describe(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|block| match block {
            Block::Prompt(p) => format!("prompt #{}: {}", p.id, p.text()),
            Block::Plain(p) => format!("plain: {}", p.html_fragment),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn prompt_ids_are_sequential_from_one() {
    for doc in documents(3) {
        let ids: Vec<_> = prompts(&parse_prompts(&doc)).map(|p| p.id).collect();
        let expected: Vec<_> = (1..=ids.len() as u32).map(PromptId).collect();
        assert_eq!(ids, expected, "document: {doc:?}");
    }
}

#[test]
fn parsing_is_deterministic() {
    for doc in documents(3) {
        assert_eq!(parse_prompts(&doc), parse_prompts(&doc), "document: {doc:?}");
    }
}

#[test]
fn append_adds_exactly_one_prompt() {
    for doc in documents(3) {
        for body in ["hello", "- already", "two\nlines"] {
            let before = prompts(&parse_prompts(&doc)).count();
            let after_text = append_prompt(&doc, body);
            let after = parse_prompts(&after_text);

            assert_eq!(prompts(&after).count(), before + 1, "document: {doc:?}");

            let expected = normalize_prompt_body(body)
                .trim_start()
                .trim_start_matches('-')
                .trim_start()
                .replace('\n', "<br>");
            let last = prompts(&after).last().map(|p| p.text());
            assert_eq!(last, Some(expected), "document: {doc:?}");
            assert!(after_text.starts_with(&doc));
        }
    }
}

#[test]
fn prompt_library_document() {
    let md = "# Prompt library\n\
              \n\
              Use **any** of these:\n\
              \n\
              - Summarize the text below.\n\
              - Translate to `French`\n  keeping tone\n\
              \n\
              ## Review\n\
              - Review this *diff*\n";

    insta::assert_snapshot!(describe(&parse_prompts(md)), @r"
    plain: <h1>Prompt library</h1>
    plain: Use <strong>any</strong> of these:
    prompt #1: Summarize the text below.
    prompt #2: Translate to `French`<br>  keeping tone
    plain: <h2>Review</h2>
    prompt #3: Review this *diff*
    ");
}
