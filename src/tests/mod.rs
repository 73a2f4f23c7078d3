// Cross-module tests exercising the full refresh-to-answer pipeline
