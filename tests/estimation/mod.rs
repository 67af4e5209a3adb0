mod map_consistency_tests;
