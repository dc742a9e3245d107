//! Prompt templates for the two analysis modes.
//!
//! Both templates ask for keyword extraction (content words only, verbs and
//! adjectives in dictionary form) and a JSON-only answer. Detail mode adds a
//! per-word emotion tag and an emotion histogram.

const DETAIL_REQUIREMENTS: &str = r#"**요구사항:**
1. **핵심 키워드 추출**: 문장에서 실질적인 의미를 가진 **명사, 동사, 형용사, 부사**만 추출하세요.
   - **제외 대상**: 조사(은/는/이/가/을/를 등), 어미(-다/-요 등), 문장부호, 특수기호는 절대 포함하지 마세요.
   - 동사와 형용사는 기본형(예: '가고' -> '가다', '예쁜' -> '예쁘다')으로 변환하세요.
2. **문맥 기반 감성 분석**: 추출된 각 단어가 **이 문장 안에서** 어떤 감정으로 쓰였는지 분석하세요.
3. 세부 감정 태깅: [기쁨, 슬픔, 분노, 놀람, 두려움, 혐오, 중립] 중 하나 선택.

**출력 형식 (JSON Only):**
{
  "morphemes": [
    {"word": "시험", "pos": "명사", "sentiment": "neutral", "specific_emotion": "중립"},
    {"word": "합격하다", "pos": "동사", "sentiment": "positive", "specific_emotion": "기쁨"},
    {"word": "행복하다", "pos": "형용사", "sentiment": "positive", "specific_emotion": "기쁨"},
    {"word": "피곤하다", "pos": "형용사", "sentiment": "negative", "specific_emotion": "슬픔"}
  ],
  "overall_sentiment": "positive",
  "sentiment_scores": { "positive": 2, "neutral": 1, "negative": 1 },
  "specific_emotion_scores": { "기쁨": 2, "슬픔": 1, "분노": 0, "놀람": 0, "두려움": 0, "혐오": 0, "중립": 1 }
}
JSON만 출력하세요."#;

const BASIC_REQUIREMENTS: &str = r#"**요구사항:**
1. **핵심 키워드 추출**: 문장에서 실질적인 의미를 가진 **명사, 동사, 형용사, 부사**만 추출하세요.
   - **제외 대상**: 조사(은/는/이/가/을/를 등), 어미(-다/-요 등), 문장부호.
   - 동사와 형용사는 기본형으로 변환하세요.
2. **감성 분석**: 각 단어의 감성을 긍정(positive), 중립(neutral), 부정(negative)으로 분류하세요.

**출력 형식 (JSON Only):**
{
  "morphemes": [
    {"word": "단어", "pos": "품사", "sentiment": "positive/neutral/negative"},
    ...
  ],
  "overall_sentiment": "positive",
  "sentiment_scores": { "positive": 0, "neutral": 0, "negative": 0 }
}
JSON만 출력하세요."#;

/// Build the single instruction sent upstream for `text`.
pub fn build_prompt(text: &str, detail: bool) -> String {
    let requirements = if detail {
        DETAIL_REQUIREMENTS
    } else {
        BASIC_REQUIREMENTS
    };

    format!(
        "다음 한국어 텍스트를 분석해주세요:\n\n\"{}\"\n\n{}",
        text, requirements
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_text_in_quotes() {
        let prompt = build_prompt("오늘은 기분이 좋다", false);
        assert!(prompt.starts_with("다음 한국어 텍스트를 분석해주세요:"));
        assert!(prompt.contains("\"오늘은 기분이 좋다\""));
    }

    #[test]
    fn modes_differ_only_in_requirements() {
        let basic = build_prompt("좋다", false);
        let detail = build_prompt("좋다", true);

        assert_ne!(basic, detail);
        assert!(detail.contains("specific_emotion_scores"));
        assert!(!basic.contains("specific_emotion"));
        assert!(basic.ends_with("JSON만 출력하세요."));
        assert!(detail.ends_with("JSON만 출력하세요."));
    }
}
