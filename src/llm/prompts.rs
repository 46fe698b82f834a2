// Prompt rendering for the plain-language statement explanation

use crate::schema::{ExplainRequest, NormalizedEntry, StatementDivision};
use std::fmt::Write;

/// Follows the company name on the first line.
pub const PROMPT_HEADER: &str = "의 재무제표(재무상태표, 손익계산서, 현금흐름표, 자본변동표)입니다. 숫자는 최근 3개년치입니다. 비전문가도 이해할 수 있도록 쉽게 요약, 해석, 특징을 설명해 주세요. (숫자 단위: 원)";

pub const EXPLANATION_CUE: &str = "설명: ";

/// Renders the prompt sent to the generation API.
///
/// Sections always appear in `BS`, `IS`, `CF`, `SC` order and keep their
/// header even when empty. Entry order is the order the caller sent.
pub fn build_explanation_prompt(request: &ExplainRequest) -> String {
    let mut prompt = String::new();

    let _ = write!(prompt, "\n아래는 {}{}", request.company, PROMPT_HEADER);
    prompt.push_str("\n\n[연도 정보]\n");
    let _ = writeln!(prompt, "- 당기: {}", request.years.thstrm);
    let _ = writeln!(prompt, "- 전기: {}", request.years.frmtrm);
    let _ = writeln!(prompt, "- 전전기: {}", request.years.bfefrmtrm);

    for division in StatementDivision::ALL {
        let _ = write!(prompt, "\n[{}]\n", division.korean_name());
        for entry in request.entries(division) {
            push_entry_line(&mut prompt, entry);
        }
    }

    prompt.push('\n');
    prompt.push_str(EXPLANATION_CUE);
    prompt
}

fn push_entry_line(prompt: &mut String, entry: &NormalizedEntry) {
    let _ = writeln!(
        prompt,
        "- {}: {} (당기), {} (전기), {} (전전기)",
        entry.account_nm, entry.thstrm_amount, entry.frmtrm_amount, entry.bfefrmtrm_amount
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::YearLabels;

    fn entry(name: &str, th: &str, frm: &str, bfe: &str) -> NormalizedEntry {
        NormalizedEntry {
            account_nm: name.to_string(),
            thstrm_amount: th.to_string(),
            frmtrm_amount: frm.to_string(),
            bfefrmtrm_amount: bfe.to_string(),
        }
    }

    fn sample_request() -> ExplainRequest {
        ExplainRequest {
            company: "ABC Corp".to_string(),
            years: YearLabels {
                thstrm: "2023년".to_string(),
                frmtrm: "2022년".to_string(),
                bfefrmtrm: "2021년".to_string(),
            },
            bs: vec![entry("Cash", "1000", "900", "800")],
            is_: vec![],
            cf: vec![],
            sc: vec![],
        }
    }

    #[test]
    fn test_prompt_contains_company_years_and_entry() {
        let prompt = build_explanation_prompt(&sample_request());

        assert!(prompt.contains("ABC Corp"));
        assert!(prompt.contains("- 당기: 2023년\n"));
        assert!(prompt.contains("- 전기: 2022년\n"));
        assert!(prompt.contains("- 전전기: 2021년\n"));
        assert!(prompt.contains("- Cash: 1000 (당기), 900 (전기), 800 (전전기)\n"));
        assert!(prompt.ends_with("\n설명: "));
    }

    #[test]
    fn test_empty_sections_keep_headers_in_order() {
        let prompt = build_explanation_prompt(&sample_request());

        let positions: Vec<usize> = ["[재무상태표]", "[손익계산서]", "[현금흐름표]", "[자본변동표]"]
            .iter()
            .map(|header| prompt.find(header).expect("section header missing"))
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(prompt.contains("[손익계산서]\n\n[현금흐름표]"));
    }

    #[test]
    fn test_exact_layout() {
        let mut request = sample_request();
        request.company = "삼성전자".to_string();
        request.sc = vec![entry("자본금", "10", "10", "0")];

        let expected = "\n아래는 삼성전자의 재무제표(재무상태표, 손익계산서, 현금흐름표, 자본변동표)입니다. 숫자는 최근 3개년치입니다. 비전문가도 이해할 수 있도록 쉽게 요약, 해석, 특징을 설명해 주세요. (숫자 단위: 원)\n\
\n[연도 정보]\n- 당기: 2023년\n- 전기: 2022년\n- 전전기: 2021년\n\
\n[재무상태표]\n- Cash: 1000 (당기), 900 (전기), 800 (전전기)\n\
\n[손익계산서]\n\
\n[현금흐름표]\n\
\n[자본변동표]\n- 자본금: 10 (당기), 10 (전기), 0 (전전기)\n\
\n설명: ";

        assert_eq!(build_explanation_prompt(&request), expected);
    }

    #[test]
    fn test_company_name_is_inserted_verbatim() {
        let mut request = sample_request();
        request.company = "{company} Holdings".to_string();

        let prompt = build_explanation_prompt(&request);
        assert!(prompt.starts_with("\n아래는 {company} Holdings의 재무제표("));
        assert_eq!(prompt.matches("{company}").count(), 1);
    }

    #[test]
    fn test_entry_order_is_preserved() {
        let mut request = sample_request();
        request.bs = vec![
            entry("유동자산", "1", "1", "1"),
            entry("비유동자산", "2", "2", "2"),
            entry("자산총계", "3", "3", "3"),
        ];

        let prompt = build_explanation_prompt(&request);
        let first = prompt.find("- 유동자산:").unwrap();
        let second = prompt.find("- 비유동자산:").unwrap();
        let third = prompt.find("- 자산총계:").unwrap();
        assert!(first < second && second < third);
    }
}
