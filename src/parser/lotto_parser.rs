// Result-page HTML parsing
use crate::model::{Draw, ParserError};
use crate::utils::{parse_korean_date, parse_round};
use scraper::{ElementRef, Html, Selector};

pub trait Parser {
    fn parse(&self, html: &str) -> Result<Draw, ParserError>;
    fn parse_latest_round(&self, html: &str) -> Result<u32, ParserError>;
}

pub struct LottoResultParser {
    round: Selector,
    date: Selector,
    win_balls: Selector,
    bonus_ball: Selector,
}

impl LottoResultParser {
    pub fn new() -> Result<Self, ParserError> {
        Ok(Self {
            round: selector("div.win_result h4 strong")?,
            date: selector("div.win_result p.desc")?,
            win_balls: selector("div.num.win span.ball_645")?,
            bonus_ball: selector("div.num.bonus span.ball_645")?,
        })
    }

    fn round_of(&self, document: &Html) -> Result<u32, ParserError> {
        let text = first_text(document, &self.round).ok_or_else(|| missing("round"))?;
        parse_round(&text).ok_or_else(|| invalid("round", &text))
    }
}

fn selector(css: &str) -> Result<Selector, ParserError> {
    Selector::parse(css).map_err(|e| ParserError::HtmlParseError(e.to_string()))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document.select(selector).next().map(text_of)
}

fn missing(field: &str) -> ParserError {
    ParserError::MissingField(field.to_string())
}

fn invalid(field: &str, value: &str) -> ParserError {
    ParserError::InvalidField {
        field: field.to_string(),
        value: value.to_string(),
    }
}

fn parse_ball(text: &str) -> Result<u8, ParserError> {
    text.parse::<u8>().map_err(|_| invalid("number", text))
}

impl Parser for LottoResultParser {
    fn parse(&self, html: &str) -> Result<Draw, ParserError> {
        let document = Html::parse_document(html);
        let round = self.round_of(&document)?;

        let date_text = first_text(&document, &self.date).ok_or_else(|| missing("draw date"))?;
        let draw_date = parse_korean_date(&date_text).ok_or_else(|| invalid("draw date", &date_text))?;

        let main_numbers = document
            .select(&self.win_balls)
            .map(|el| parse_ball(&text_of(el)))
            .collect::<Result<Vec<u8>, _>>()?;
        if main_numbers.is_empty() {
            return Err(missing("winning numbers"));
        }

        let bonus_text = first_text(&document, &self.bonus_ball).ok_or_else(|| missing("bonus number"))?;
        let bonus_number = parse_ball(&bonus_text)?;

        Ok(Draw::new(round, draw_date, &main_numbers, bonus_number)?)
    }

    fn parse_latest_round(&self, html: &str) -> Result<u32, ParserError> {
        let document = Html::parse_document(html);
        self.round_of(&document)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// Minimal copy of the result page markup.
    pub(crate) fn result_page(round: u32, date: &str, numbers: [u8; 6], bonus: u8) -> String {
        let balls: String = numbers
            .iter()
            .enumerate()
            .map(|(i, n)| format!(r#"<span class="ball_645 lrg ball{}">{}</span>"#, i + 1, n))
            .collect();
        format!(
            r#"<html><body>
            <div class="win_result">
              <h4><strong>{round}회</strong> 당첨결과</h4>
              <p class="desc">({date} 추첨)</p>
              <div class="nums">
                <div class="num win"><strong>당첨번호</strong><p>{balls}</p></div>
                <div class="num bonus"><strong>보너스</strong><p><span class="ball_645 lrg ball5">{bonus}</span></p></div>
              </div>
            </div>
            </body></html>"#
        )
    }

    #[test]
    fn parses_a_result_page() {
        let html = result_page(1100, "2023년 12월 30일", [17, 26, 29, 30, 31, 43], 12);
        let draw = LottoResultParser::new().unwrap().parse(&html).unwrap();

        assert_eq!(draw.sequence_number(), 1100);
        assert_eq!(draw.draw_date(), NaiveDate::from_ymd_opt(2023, 12, 30).unwrap());
        assert_eq!(draw.main_numbers(), &[17, 26, 29, 30, 31, 43]);
        assert_eq!(draw.bonus_number(), 12);
    }

    #[test]
    fn latest_round_only_needs_the_heading() {
        let html = r#"<div class="win_result"><h4><strong>1145회</strong> 당첨결과</h4></div>"#;
        assert_eq!(LottoResultParser::new().unwrap().parse_latest_round(html).unwrap(), 1145);
    }

    #[test]
    fn missing_bonus_is_reported() {
        let html = result_page(3, "2002년 12월 21일", [11, 16, 19, 21, 27, 31], 30)
            .replace("num bonus", "num other");
        let err = LottoResultParser::new().unwrap().parse(&html).unwrap_err();
        assert!(matches!(err, ParserError::MissingField(f) if f == "bonus number"));
    }

    #[test]
    fn invalid_draw_is_rejected() {
        let html = result_page(3, "2002년 12월 21일", [11, 16, 16, 21, 27, 31], 30);
        let err = LottoResultParser::new().unwrap().parse(&html).unwrap_err();
        assert!(matches!(err, ParserError::InvalidDraw(_)));
    }

    #[test]
    fn empty_page_has_no_round() {
        let err = LottoResultParser::new().unwrap().parse("<html></html>").unwrap_err();
        assert!(matches!(err, ParserError::MissingField(_)));
    }
}
