pub mod tweet_pipeline;
