// ==========================================
// 集成测试公共辅助
// ==========================================

#![allow(dead_code)]

pub mod mock_services;
pub mod test_data_builder;
