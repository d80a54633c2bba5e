mod catalog_config_tests;
