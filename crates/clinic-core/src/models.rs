//! 核心数据模型定义

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 患者记录
///
/// 字段顺序与 `patients` 表的列顺序一致，序列化时保持该顺序。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,                    // 由存储层生成
    pub name: String,               // 患者姓名
    pub age: i32,                   // 年龄
    pub gender: String,             // 性别
    pub contact_number: String,     // 联系电话
    pub address: String,            // 住址
    pub medical_history: String,    // 既往病史
    pub admission_date: NaiveDate,  // 入院日期
}

/// 待插入的患者记录，不含标识符
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub contact_number: String,
    pub address: String,
    pub medical_history: String,
    pub admission_date: NaiveDate,
}

impl NewPatient {
    /// 附加存储层分配的标识符
    pub fn with_id(self, id: i64) -> Patient {
        Patient {
            id,
            name: self.name,
            age: self.age,
            gender: self.gender,
            contact_number: self.contact_number,
            address: self.address,
            medical_history: self.medical_history,
            admission_date: self.admission_date,
        }
    }
}
