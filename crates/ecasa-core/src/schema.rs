/// Arrow schema definitions for the labeled tweet dataset.
pub mod tweets {
    use arrow::datatypes::{DataType, Field, Schema};

    pub const TABLE: &str = "tweets";
    pub const SENTIMENT: &str = "sentiment";
    pub const MESSAGE: &str = "message";
    pub const TWEET_ID: &str = "tweetid";

    /// Schema of `train.csv`: one row per tweet with its stance code.
    pub fn tweets_schema() -> Schema {
        Schema::new(vec![
            Field::new(SENTIMENT, DataType::Int64, false),
            Field::new(MESSAGE, DataType::Utf8, false),
            Field::new(TWEET_ID, DataType::Int64, true),
        ])
    }
}
