//! Messages shared by the unit tests.

/// Report as the users actually sent it: comma separators and indentation.
pub const OLD_BILL: &str = "
    Хол. вода:
    Было - 579
    Стало - 587

    8 * 59,8 = 478

    Гор. вода:
    Было - 47
    Стало - 49

    2 * 272,14 = 544,28

    Водоотведение:
    10 * 45,91 = 459,1

    Электроэнергия:
    Было - 7984
    Стало - 8108

    124 * 6,99 = 866,76

    Итого: 2348,14

    #счетчики 22.06.2025
";

/// Report without the disposal section.
pub const OLD_BILL_WITHOUT_DISPOSAL: &str = "\
Хол. вода:
Было - 579
Стало - 587

8 * 59.8 = 478.40

Гор. вода:
Было - 47
Стало - 49

2 * 272.14 = 544.28

Электроэнергия:
Было - 7984
Стало - 8108

124 * 6.99 = 866.76

Итого: 1889.44

#счетчики 22.06.2025";

/// Report without the cold water section.
pub const OLD_BILL_WITHOUT_COLD_WATER: &str = "\
Гор. вода:
Было - 47
Стало - 49

2 * 272.14 = 544.28

Водоотведение:
2 * 45.91 = 91.82

Электроэнергия:
Было - 7984
Стало - 8108

124 * 6.99 = 866.76

Итого: 1502.86

#счетчики 22.06.2025";
