pub mod schema;
pub mod validate;

pub use schema::{
    AnswerOption, Catalog, Dimension, EligibilityRule, Question, QuestionType,
    QuestionTypeParseError, Section,
};
pub use validate::{validate_catalog, CatalogWarning};
